use crate::errors::{TransformError, TransformResult};
use serde::{Deserialize, Serialize};

pub const V1_VERSION: &str = "1.0.0";
pub const V1_SCHEMA_URI: &str = "http://json.schemastore.org/sarif-1.0.0";
pub const CURRENT_VERSION: &str = "2.1.0";
pub const CURRENT_SCHEMA_URI: &str = "https://json.schemastore.org/sarif-2.1.0.json";

/// SARIF schema generations understood by the transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SarifVersion {
    #[serde(rename = "v1", alias = "1.0.0")]
    OneZeroZero,
    #[serde(rename = "v2", alias = "2.1.0")]
    Current,
}

impl SarifVersion {
    pub fn major(&self) -> u32 {
        match self {
            SarifVersion::OneZeroZero => 1,
            SarifVersion::Current => 2,
        }
    }

    pub fn version_string(&self) -> &'static str {
        match self {
            SarifVersion::OneZeroZero => V1_VERSION,
            SarifVersion::Current => CURRENT_VERSION,
        }
    }

    pub fn schema_uri(&self) -> &'static str {
        match self {
            SarifVersion::OneZeroZero => V1_SCHEMA_URI,
            SarifVersion::Current => CURRENT_SCHEMA_URI,
        }
    }

    /// Prefix used for property-bag entries written by a transform whose
    /// source document had this version, e.g. `sarifv2`.
    pub fn property_bag_prefix(&self) -> &'static str {
        match self {
            SarifVersion::OneZeroZero => "sarifv1",
            SarifVersion::Current => "sarifv2",
        }
    }

    pub fn parse(version: &str) -> TransformResult<Self> {
        match version {
            V1_VERSION => Ok(SarifVersion::OneZeroZero),
            CURRENT_VERSION => Ok(SarifVersion::Current),
            other => Err(TransformError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl std::str::FromStr for SarifVersion {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" | "1" => Ok(SarifVersion::OneZeroZero),
            "v2" | "2" | "current" => Ok(SarifVersion::Current),
            other => SarifVersion::parse(other),
        }
    }
}

impl std::fmt::Display for SarifVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.version_string())
    }
}

/// Reads the top-level `version` property without binding the rest of the
/// document to either object model.
pub fn sniff_version(text: &str) -> TransformResult<SarifVersion> {
    #[derive(Deserialize)]
    struct Probe {
        version: Option<String>,
    }

    let probe: Probe = serde_json::from_str(text)?;
    match probe.version {
        Some(v) => SarifVersion::parse(&v),
        None => Err(TransformError::MissingVersion),
    }
}
