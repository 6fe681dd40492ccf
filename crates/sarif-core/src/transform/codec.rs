use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::property_bag::run_stash_key;
use crate::model::PropertyBag;
use crate::version::SarifVersion;

/// Compact JSON text of `entity`, produced by the same serializer used for
/// whole documents so the text is reproducible byte-for-byte.
pub fn stash<T: Serialize>(entity: &T) -> serde_json::Result<String> {
    serde_json::to_string(entity)
}

/// Stores the pre-image of a run written in `source` version under
/// `sarifv{N}/run`. Serialization failures are logged and the run is emitted
/// without a stash.
pub fn stash_run<T: Serialize>(bag: &mut PropertyBag, source: SarifVersion, run: &T) {
    let key = run_stash_key(source);
    let stored = stash(run).and_then(|text| {
        let len = text.len();
        bag.set_raw(key, text).map(|_| len)
    });

    match stored {
        Ok(bytes) => tracing::debug!(
            event = "sarif.transform.stashed",
            key = key,
            bytes = bytes,
            "stashed source run"
        ),
        Err(e) => tracing::warn!(
            event = "sarif.transform.stash_failed",
            key = key,
            error = %e,
            "could not stash source run"
        ),
    }
}

/// Removes the stash for `version` from `bag` and decodes it.
///
/// The key is consumed even when its content does not decode, so a broken
/// stash never travels further.
pub fn try_restore<T: DeserializeOwned>(bag: &mut PropertyBag, version: SarifVersion) -> Option<T> {
    let key = run_stash_key(version);
    let raw = bag.remove(key)?;
    match serde_json::from_str::<T>(raw.get()) {
        Ok(entity) => {
            tracing::debug!(
                event = "sarif.transform.restored_from_stash",
                key = key,
                "restored run from stash"
            );
            Some(entity)
        }
        Err(e) => {
            tracing::warn!(
                event = "sarif.transform.stash_unreadable",
                key = key,
                error = %e,
                "ignoring unreadable run stash"
            );
            None
        }
    }
}
