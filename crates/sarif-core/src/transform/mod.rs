//! Conversion between SARIF 1.0.0 and 2.1.0 documents.
//!
//! Every converted run carries the compact JSON of its source run under
//! `sarifv{N}/run`. Converting such a run back restores it from that stash,
//! which makes a round trip reproduce the original run exactly.

pub mod codec;
pub mod logical;
pub mod mapping;
pub mod region;
pub mod visit;

mod to_v1;
mod to_v2;

use std::path::Path;

use serde::Serialize;

pub use to_v1::run_to_v1;
pub use to_v2::run_to_v2;

use crate::errors::{TransformError, TransformResult};
use crate::model::v1::SarifLogV1;
use crate::model::v2::SarifLog;
use crate::version::{sniff_version, SarifVersion};

/// `partialFingerprints` entry holding a 1.0.0 `toolFingerprintContribution`.
pub(crate) const TOOL_FINGERPRINT_KEY: &str = "toolFingerprintContribution";

pub fn transform_log_to_v1(log: &SarifLog) -> SarifLogV1 {
    SarifLogV1::new(log.runs.iter().map(run_to_v1).collect())
}

pub fn transform_log_to_v2(log: &SarifLogV1) -> SarifLog {
    SarifLog::new(log.runs.iter().map(run_to_v2).collect())
}

/// A parsed log of either generation.
#[derive(Debug, Clone, PartialEq)]
pub enum SarifDocument {
    V1(SarifLogV1),
    V2(SarifLog),
}

impl SarifDocument {
    pub fn version(&self) -> SarifVersion {
        match self {
            SarifDocument::V1(_) => SarifVersion::OneZeroZero,
            SarifDocument::V2(_) => SarifVersion::Current,
        }
    }

    pub fn run_count(&self) -> usize {
        match self {
            SarifDocument::V1(log) => log.runs.len(),
            SarifDocument::V2(log) => log.runs.len(),
        }
    }

    /// Serializes with the same compact serializer used for run stashes, or
    /// with two-space indentation when `pretty` is set.
    pub fn to_json(&self, pretty: bool) -> TransformResult<String> {
        match self {
            SarifDocument::V1(log) => write_json(log, pretty),
            SarifDocument::V2(log) => write_json(log, pretty),
        }
    }
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> TransformResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

pub fn parse_document(text: &str) -> TransformResult<SarifDocument> {
    Ok(match sniff_version(text)? {
        SarifVersion::OneZeroZero => SarifDocument::V1(serde_json::from_str(text)?),
        SarifVersion::Current => SarifDocument::V2(serde_json::from_str(text)?),
    })
}

/// Converts `document` to `target`. A document already at `target` is
/// returned with its `$schema` normalized.
pub fn transform_document(document: SarifDocument, target: SarifVersion) -> SarifDocument {
    let source = document.version();
    let converted = match (document, target) {
        (SarifDocument::V1(log), SarifVersion::Current) => {
            SarifDocument::V2(transform_log_to_v2(&log))
        }
        (SarifDocument::V2(log), SarifVersion::OneZeroZero) => {
            SarifDocument::V1(transform_log_to_v1(&log))
        }
        (SarifDocument::V1(mut log), SarifVersion::OneZeroZero) => {
            log.schema = Some(target.schema_uri().to_string());
            SarifDocument::V1(log)
        }
        (SarifDocument::V2(mut log), SarifVersion::Current) => {
            log.schema = Some(target.schema_uri().to_string());
            SarifDocument::V2(log)
        }
    };

    tracing::debug!(
        event = "sarif.transform.document",
        from = %source,
        to = %target,
        runs = converted.run_count(),
        "transformed document"
    );
    converted
}

pub fn transform_text(text: &str, target: SarifVersion, pretty: bool) -> TransformResult<String> {
    let document = parse_document(text)?;
    transform_document(document, target).to_json(pretty)
}

pub fn transform_file(
    input: &Path,
    target: SarifVersion,
    pretty: bool,
) -> TransformResult<String> {
    let text = std::fs::read_to_string(input).map_err(|error| TransformError::IoWithPath {
        error,
        path: input.to_path_buf(),
    })?;
    transform_text(&text, target, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1_LOG: &str = r#"{"$schema":"http://json.schemastore.org/sarif-1.0.0","version":"1.0.0","runs":[{"tool":{"name":"CodeScanner","semanticVersion":"2.1.0"},"results":[{"ruleId":"C2001","level":"error","message":"Variable is declared but never used.","locations":[{"resultFile":{"uri":"file:///home/buildAgent/src/collections/list.cpp","region":{"startLine":15,"startColumn":9}}}]}]}]}"#;

    #[test]
    fn test_v1_round_trip_is_byte_exact() {
        let v2 = transform_text(V1_LOG, SarifVersion::Current, false).unwrap();
        assert!(v2.contains(r#""version":"2.1.0""#));
        assert!(v2.contains(r#""sarifv1/run":{"tool":{"name":"CodeScanner""#));

        let back = transform_text(&v2, SarifVersion::OneZeroZero, false).unwrap();
        assert_eq!(back, V1_LOG);
    }

    #[test]
    fn test_same_version_normalizes_schema() {
        let text = r#"{"$schema":"https://example.com/old.json","version":"2.1.0","runs":[]}"#;
        let out = transform_text(text, SarifVersion::Current, false).unwrap();
        assert_eq!(
            out,
            r#"{"$schema":"https://json.schemastore.org/sarif-2.1.0.json","version":"2.1.0","runs":[]}"#
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = transform_file(
            Path::new("/nonexistent/input.sarif"),
            SarifVersion::Current,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/input.sarif"));
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let out = transform_text(V1_LOG, SarifVersion::Current, true).unwrap();
        assert!(out.starts_with("{\n  \"$schema\""));
    }
}
