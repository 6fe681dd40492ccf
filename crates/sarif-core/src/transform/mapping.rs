//! Value mappings between the 1.0.0 and 2.1.0 enumerations.
//!
//! Each `*_to_v2` / `*_to_v1` function handles known values only. Callers
//! route `Unknown` values through [`record_passthrough`] so the original text
//! is kept in the destination entity's property bag.

use crate::model::v1::{
    AlgorithmKindV1, BaselineStateV1, ImportanceV1, NotificationLevelV1, ResultLevelV1,
    SuppressionStateV1, SuppressionStatesV1,
};
use crate::model::v2::{
    BaselineState, FailureLevel, ResultKind, Suppression, SuppressionKind,
    ThreadFlowLocationImportance,
};
use crate::model::PropertyBag;
use crate::version::SarifVersion;

/// Writes `sarifv{N}/{field}` = `raw` where N is the source major version.
pub(crate) fn record_passthrough(
    properties: &mut Option<PropertyBag>,
    source: SarifVersion,
    field: &str,
    raw: &str,
) {
    let key = format!("{}/{}", source.property_bag_prefix(), field);
    tracing::debug!(
        event = "sarif.transform.passthrough_enum",
        key = %key,
        value = raw,
        "unrecognized enum value kept in property bag"
    );
    // A string always serializes.
    let _ = bag_mut(properties).set(&key, raw);
}

/// Reads a value an earlier transform recorded for the `dest` version.
pub(crate) fn passthrough_for(
    source_bag: &Option<PropertyBag>,
    dest: SarifVersion,
    field: &str,
) -> Option<String> {
    let key = format!("{}/{}", dest.property_bag_prefix(), field);
    source_bag.as_ref().and_then(|bag| bag.get_as::<String>(&key))
}

pub(crate) fn bag_mut(properties: &mut Option<PropertyBag>) -> &mut PropertyBag {
    properties.get_or_insert_with(PropertyBag::new)
}

const TAGS_KEY: &str = "tags";

/// Moves a 2.1.0 `properties.tags` array out into a 1.0.0 `tags` list.
pub(crate) fn take_tags(properties: &mut Option<PropertyBag>) -> Option<Vec<String>> {
    let bag = properties.as_mut()?;
    let tags = bag.get_as::<Vec<String>>(TAGS_KEY)?;
    bag.remove(TAGS_KEY);
    if bag.is_empty() {
        *properties = None;
    }
    Some(tags)
}

/// Stores a 1.0.0 `tags` list as `properties.tags`.
pub(crate) fn put_tags(properties: &mut Option<PropertyBag>, tags: &Option<Vec<String>>) {
    if let Some(tags) = tags {
        let _ = bag_mut(properties).set(TAGS_KEY, tags);
    }
}

pub fn result_level_to_v2(level: &ResultLevelV1) -> (Option<ResultKind>, Option<FailureLevel>) {
    match level {
        ResultLevelV1::Error => (None, Some(FailureLevel::Error)),
        ResultLevelV1::Warning => (None, Some(FailureLevel::Warning)),
        ResultLevelV1::Note => (None, Some(FailureLevel::Note)),
        ResultLevelV1::Pass => (Some(ResultKind::Pass), Some(FailureLevel::None)),
        ResultLevelV1::NotApplicable => {
            (Some(ResultKind::NotApplicable), Some(FailureLevel::None))
        }
        ResultLevelV1::Default | ResultLevelV1::Unknown(_) => (None, None),
    }
}

/// Folds `kind` and `level` into a 1.0.0 level. Absent on both sides stays
/// absent.
pub fn result_level_to_v1(
    kind: Option<&ResultKind>,
    level: Option<&FailureLevel>,
) -> Option<ResultLevelV1> {
    if kind.is_none() && level.is_none() {
        return None;
    }

    let kind = kind.cloned().unwrap_or(ResultKind::Fail);
    let level = if kind == ResultKind::Fail {
        level.cloned().unwrap_or(FailureLevel::Warning)
    } else {
        FailureLevel::None
    };

    Some(match level {
        FailureLevel::Error => ResultLevelV1::Error,
        FailureLevel::Warning => ResultLevelV1::Warning,
        FailureLevel::Note => ResultLevelV1::Note,
        FailureLevel::None => match kind {
            ResultKind::Pass => ResultLevelV1::Pass,
            ResultKind::NotApplicable => ResultLevelV1::NotApplicable,
            _ => ResultLevelV1::Default,
        },
        FailureLevel::Unknown(_) => ResultLevelV1::Default,
    })
}

pub fn notification_level_to_v2(level: &NotificationLevelV1) -> Option<FailureLevel> {
    match level {
        NotificationLevelV1::Error => Some(FailureLevel::Error),
        NotificationLevelV1::Note => Some(FailureLevel::Note),
        NotificationLevelV1::Warning => Some(FailureLevel::Warning),
        NotificationLevelV1::Unknown(_) => None,
    }
}

pub fn notification_level_to_v1(level: &FailureLevel) -> NotificationLevelV1 {
    match level {
        FailureLevel::Error => NotificationLevelV1::Error,
        FailureLevel::Note => NotificationLevelV1::Note,
        _ => NotificationLevelV1::Warning,
    }
}

pub fn rule_default_level_to_v2(level: &ResultLevelV1) -> FailureLevel {
    match level {
        ResultLevelV1::Error => FailureLevel::Error,
        ResultLevelV1::Pass => FailureLevel::Note,
        _ => FailureLevel::Warning,
    }
}

pub fn rule_default_level_to_v1(level: &FailureLevel) -> ResultLevelV1 {
    match level {
        FailureLevel::Error => ResultLevelV1::Error,
        FailureLevel::Note => ResultLevelV1::Pass,
        _ => ResultLevelV1::Warning,
    }
}

pub fn baseline_state_to_v2(state: &BaselineStateV1) -> Option<BaselineState> {
    match state {
        BaselineStateV1::New => Some(BaselineState::New),
        BaselineStateV1::Existing => Some(BaselineState::Unchanged),
        BaselineStateV1::Absent => Some(BaselineState::Absent),
        BaselineStateV1::Unknown(_) => None,
    }
}

pub fn baseline_state_to_v1(state: &BaselineState) -> Option<BaselineStateV1> {
    match state {
        BaselineState::New => Some(BaselineStateV1::New),
        BaselineState::Unchanged | BaselineState::Updated => Some(BaselineStateV1::Existing),
        BaselineState::Absent => Some(BaselineStateV1::Absent),
        BaselineState::Unknown(_) => None,
    }
}

pub fn importance_to_v2(importance: &ImportanceV1) -> ThreadFlowLocationImportance {
    match importance {
        ImportanceV1::Essential => ThreadFlowLocationImportance::Essential,
        ImportanceV1::Unimportant => ThreadFlowLocationImportance::Unimportant,
        _ => ThreadFlowLocationImportance::Important,
    }
}

pub fn importance_to_v1(importance: &ThreadFlowLocationImportance) -> ImportanceV1 {
    match importance {
        ThreadFlowLocationImportance::Essential => ImportanceV1::Essential,
        ThreadFlowLocationImportance::Unimportant => ImportanceV1::Unimportant,
        _ => ImportanceV1::Important,
    }
}

/// Flag set to suppression objects; `external` is listed before `inSource`.
/// Unrecognized flags are returned separately.
pub fn suppressions_to_v2(states: &SuppressionStatesV1) -> (Vec<Suppression>, Vec<String>) {
    let mut suppressions = Vec::new();
    if states.contains(&SuppressionStateV1::SuppressedExternally) {
        suppressions.push(Suppression {
            kind: SuppressionKind::External,
            justification: None,
            properties: None,
        });
    }
    if states.contains(&SuppressionStateV1::SuppressedInSource) {
        suppressions.push(Suppression {
            kind: SuppressionKind::InSource,
            justification: None,
            properties: None,
        });
    }

    let unknown = states
        .0
        .iter()
        .filter_map(|s| match s {
            SuppressionStateV1::Unknown(raw) => Some(raw.clone()),
            _ => None,
        })
        .collect();

    (suppressions, unknown)
}

pub fn suppressions_to_v1(suppressions: &[Suppression]) -> (SuppressionStatesV1, Vec<String>) {
    let in_source = suppressions
        .iter()
        .any(|s| s.kind == SuppressionKind::InSource);
    let external = suppressions
        .iter()
        .any(|s| s.kind == SuppressionKind::External);

    let mut states = SuppressionStatesV1::default();
    if in_source {
        states.insert(SuppressionStateV1::SuppressedInSource);
    }
    if external {
        states.insert(SuppressionStateV1::SuppressedExternally);
    }

    let unknown = suppressions
        .iter()
        .filter_map(|s| match &s.kind {
            SuppressionKind::Unknown(raw) => Some(raw.clone()),
            _ => None,
        })
        .collect();

    (states, unknown)
}

const HASH_NAMES: &[(AlgorithmKindV1, &str)] = &[
    (AlgorithmKindV1::Sha1, "sha-1"),
    (AlgorithmKindV1::Sha3, "sha-3"),
    (AlgorithmKindV1::Sha224, "sha-224"),
    (AlgorithmKindV1::Sha256, "sha-256"),
    (AlgorithmKindV1::Sha384, "sha-384"),
    (AlgorithmKindV1::Sha512, "sha-512"),
];

/// Hash map key for a 1.0.0 algorithm; algorithms without a hyphenated
/// name keep their 1.0.0 spelling.
pub fn hash_algorithm_name(kind: &AlgorithmKindV1) -> String {
    HASH_NAMES
        .iter()
        .find(|(k, _)| k == kind)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| kind.as_str().to_string())
}

pub fn hash_algorithm_kind(name: &str) -> AlgorithmKindV1 {
    HASH_NAMES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(k, _)| k.clone())
        .unwrap_or_else(|| AlgorithmKindV1::from(name))
}

/// MIME types whose 1.0.0 base64 contents are carried as 2.1.0 `text`.
pub fn is_text_mime_type(mime_type: Option<&str>) -> bool {
    match mime_type {
        Some(m) => {
            m.starts_with("text/")
                || matches!(m, "application/json" | "application/xml" | "application/x-sh")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_level_round_trip_for_known_levels() {
        for level in [
            ResultLevelV1::Error,
            ResultLevelV1::Warning,
            ResultLevelV1::Note,
            ResultLevelV1::Pass,
            ResultLevelV1::NotApplicable,
        ] {
            let (kind, v2_level) = result_level_to_v2(&level);
            assert_eq!(
                result_level_to_v1(kind.as_ref(), v2_level.as_ref()),
                Some(level)
            );
        }
    }

    #[test]
    fn test_result_level_to_v1_kind_overrides_level() {
        assert_eq!(
            result_level_to_v1(Some(&ResultKind::Review), Some(&FailureLevel::Error)),
            Some(ResultLevelV1::Default)
        );
        assert_eq!(
            result_level_to_v1(None, Some(&FailureLevel::Note)),
            Some(ResultLevelV1::Note)
        );
        assert_eq!(
            result_level_to_v1(Some(&ResultKind::Fail), None),
            Some(ResultLevelV1::Warning)
        );
        assert_eq!(result_level_to_v1(None, None), None);
    }

    #[test]
    fn test_suppressions_both_directions() {
        let states = SuppressionStatesV1(vec![
            SuppressionStateV1::SuppressedInSource,
            SuppressionStateV1::SuppressedExternally,
            SuppressionStateV1::Unknown("suppressedByPolicy".into()),
        ]);
        let (suppressions, unknown) = suppressions_to_v2(&states);
        let kinds: Vec<_> = suppressions.iter().map(|s| s.kind.clone()).collect();
        assert_eq!(kinds, vec![SuppressionKind::External, SuppressionKind::InSource]);
        assert_eq!(unknown, vec!["suppressedByPolicy".to_string()]);

        let (back, unknown) = suppressions_to_v1(&suppressions);
        assert!(unknown.is_empty());
        assert_eq!(
            back.0,
            vec![
                SuppressionStateV1::SuppressedInSource,
                SuppressionStateV1::SuppressedExternally
            ]
        );
    }

    #[test]
    fn test_baseline_updated_collapses_to_existing() {
        assert_eq!(
            baseline_state_to_v1(&BaselineState::Updated),
            Some(BaselineStateV1::Existing)
        );
        assert_eq!(
            baseline_state_to_v2(&BaselineStateV1::Existing),
            Some(BaselineState::Unchanged)
        );
    }

    #[test]
    fn test_hash_algorithm_names() {
        assert_eq!(hash_algorithm_name(&AlgorithmKindV1::Sha256), "sha-256");
        assert_eq!(hash_algorithm_name(&AlgorithmKindV1::Md5), "md5");
        assert_eq!(hash_algorithm_kind("sha-1"), AlgorithmKindV1::Sha1);
        assert_eq!(
            hash_algorithm_kind("xxhash64"),
            AlgorithmKindV1::Unknown("xxhash64".into())
        );
    }

    #[test]
    fn test_passthrough_key_uses_source_prefix() {
        let mut source = None;
        record_passthrough(&mut source, SarifVersion::Current, "level", "fatal");
        assert_eq!(
            source.as_ref().unwrap().get_raw("sarifv2/level"),
            Some(r#""fatal""#)
        );

        assert_eq!(
            passthrough_for(&source, SarifVersion::Current, "level").as_deref(),
            Some("fatal")
        );
        assert!(passthrough_for(&source, SarifVersion::OneZeroZero, "level").is_none());
    }
}
