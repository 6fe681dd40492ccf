//! SARIF 1.0.0 object model.
//!
//! Keyed collections (`files`, `logicalLocations`, `rules`) are `IndexMap`s so
//! that document order survives a parse/serialize cycle.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{PropertyBag, Timestamp};
use crate::version::{V1_SCHEMA_URI, V1_VERSION};

sarif_enum!(
    /// Result severity in 1.0.0; `pass` and `notApplicable` double as the
    /// result kind.
    ResultLevelV1 {
        NotApplicable => "notApplicable",
        Pass => "pass",
        Note => "note",
        Warning => "warning",
        Default => "default",
        Error => "error",
    }
);

sarif_enum!(NotificationLevelV1 {
    Note => "note",
    Warning => "warning",
    Error => "error",
});

sarif_enum!(BaselineStateV1 {
    New => "new",
    Existing => "existing",
    Absent => "absent",
});

sarif_enum!(SuppressionStateV1 {
    SuppressedInSource => "suppressedInSource",
    SuppressedExternally => "suppressedExternally",
});

sarif_enum!(RuleConfigurationV1 {
    Enabled => "enabled",
    Disabled => "disabled",
});

sarif_enum!(ImportanceV1 {
    Important => "important",
    Essential => "essential",
    Unimportant => "unimportant",
});

sarif_enum!(AlgorithmKindV1 {
    Blake256 => "blake256",
    Blake512 => "blake512",
    Md4 => "md4",
    Md5 => "md5",
    RipeMd160 => "ripeMd160",
    Sha1 => "sha1",
    Sha224 => "sha224",
    Sha256 => "sha256",
    Sha384 => "sha384",
    Sha512 => "sha512",
    Sha3 => "sha3",
    Tiger => "tiger",
    Whirlpool => "whirlpool",
});

/// `suppressionStates`: a flag set written as an array of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuppressionStatesV1(pub Vec<SuppressionStateV1>);

impl SuppressionStatesV1 {
    pub fn contains(&self, state: &SuppressionStateV1) -> bool {
        self.0.contains(state)
    }

    pub fn insert(&mut self, state: SuppressionStateV1) {
        if !self.contains(&state) {
            self.0.push(state);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifLogV1 {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub version: String,
    pub runs: Vec<RunV1>,
}

impl SarifLogV1 {
    pub fn new(runs: Vec<RunV1>) -> Self {
        Self {
            schema: Some(V1_SCHEMA_URI.to_string()),
            version: V1_VERSION.to_string(),
            runs,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunV1 {
    #[serde(default)]
    pub tool: ToolV1,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<InvocationV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<IndexMap<String, FileDataV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_locations: Option<IndexMap<String, LogicalLocationV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ResultV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_notifications: Option<Vec<NotificationV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_notifications: Option<Vec<NotificationV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<IndexMap<String, RuleV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolV1 {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sarif_logger_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_files: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDataV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_base_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64-encoded file bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Vec<HashV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashV1 {
    pub value: String,
    pub algorithm: AlgorithmKindV1,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalLocationV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleV1 {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_formats: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<RuleConfigurationV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_level: Option<ResultLevelV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<ResultLevelV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_rule_message: Option<FormattedRuleMessageV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<LocationV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_fingerprint_contribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacks: Option<Vec<StackV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_flows: Option<Vec<CodeFlowV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_locations: Option<Vec<AnnotatedCodeLocationV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppression_states: Option<SuppressionStatesV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_state: Option<BaselineStateV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixes: Option<Vec<FixV1>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRuleMessageV1 {
    pub format_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_target: Option<PhysicalLocationV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_file: Option<PhysicalLocationV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_logical_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_location_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decorated_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocationV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_base_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionV1>,
}

/// Line/column or byte offset/length addressing within a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFlowV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub locations: Vec<AnnotatedCodeLocationV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedCodeLocationV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_location: Option<PhysicalLocationV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_logical_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_location_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub essential: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<ImportanceV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub frames: Vec<StackFrameV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrameV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_base_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_logical_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_location_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub file_changes: Vec<FileChangeV1>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChangeV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_base_id: Option<String>,
    #[serde(default)]
    pub replacements: Vec<ReplacementV1>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_length: Option<i64>,
    /// Base64-encoded replacement bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_bytes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_location: Option<PhysicalLocationV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<NotificationLevelV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionDataV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDataV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<StackV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_exceptions: Option<Vec<ExceptionDataV1>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_v1_log() {
        let text = r#"{"$schema":"http://json.schemastore.org/sarif-1.0.0","version":"1.0.0","runs":[{"tool":{"name":"CodeScanner"},"files":{"file:///b.c":{"mimeType":"text/x-c"},"file:///a.c":{}},"results":[{"ruleId":"C1","level":"error","suppressionStates":["suppressedExternally"]}]}]}"#;
        let log: SarifLogV1 = serde_json::from_str(text).unwrap();
        let run = &log.runs[0];

        let keys: Vec<_> = run.files.as_ref().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["file:///b.c", "file:///a.c"]);

        let result = &run.results.as_ref().unwrap()[0];
        assert_eq!(result.level, Some(ResultLevelV1::Error));
        assert!(result
            .suppression_states
            .as_ref()
            .unwrap()
            .contains(&SuppressionStateV1::SuppressedExternally));

        assert_eq!(serde_json::to_string(&log).unwrap(), text);
    }

    #[test]
    fn test_unknown_level_survives_parse() {
        let result: ResultV1 = serde_json::from_str(r#"{"level":"catastrophic"}"#).unwrap();
        assert_eq!(result.level, Some(ResultLevelV1::Unknown("catastrophic".into())));
    }
}
