//! 1.0.0 → 2.1.0.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;

use super::codec;
use super::logical::LogicalIndices;
use super::mapping::{self, hash_algorithm_name, passthrough_for, put_tags, record_passthrough};
use super::region::region_to_v2;
use super::TOOL_FINGERPRINT_KEY;
use crate::model::property_bag::carry_properties;
use crate::model::v1::{
    AnnotatedCodeLocationV1, CodeFlowV1, ExceptionDataV1, FileDataV1, FixV1, InvocationV1,
    LocationV1, NotificationLevelV1, NotificationV1, PhysicalLocationV1, ResultV1,
    RuleConfigurationV1, RuleV1, RunV1, StackFrameV1, StackV1,
};
use crate::model::v2::{
    Address, Artifact, ArtifactChange, ArtifactContent, ArtifactLocation, CodeFlow, Exception,
    FailureLevel, Fix, Invocation, Location, LogicalLocation, Message, MultiformatMessageString,
    Notification, PhysicalLocation, Region, Replacement, ReportingConfiguration,
    ReportingDescriptor, ReportingDescriptorReference, Result, ResultKind, Run,
    RunAutomationDetails, Stack, StackFrame, ThreadFlow, ThreadFlowLocation,
    ThreadFlowLocationImportance, Tool, ToolComponent,
};
use crate::version::SarifVersion;

const SOURCE: SarifVersion = SarifVersion::OneZeroZero;
const DEST: SarifVersion = SarifVersion::Current;

/// Converts one run. A run carrying a 2.1.0 stash is restored from it;
/// otherwise it is converted field by field and its own pre-image is stashed.
pub fn run_to_v2(run: &RunV1) -> Run {
    if let Some(mut bag) = run.properties.clone() {
        if let Some(mut restored) = codec::try_restore::<Run>(&mut bag, DEST) {
            if let Some(props) = restored.properties.as_mut() {
                props.strip_run_stashes();
            }
            return restored;
        }
    }

    let mut converted = ToV2::new(run).run();

    let mut pre_image = run.clone();
    if let Some(props) = pre_image.properties.as_mut() {
        props.strip_run_stashes();
        if props.is_empty() && run.properties.as_ref().is_some_and(|p| !p.is_empty()) {
            pre_image.properties = None;
        }
    }
    codec::stash_run(mapping::bag_mut(&mut converted.properties), SOURCE, &pre_image);

    converted
}

struct ToV2<'a> {
    run: &'a RunV1,
    logical: LogicalIndices,
}

impl<'a> ToV2<'a> {
    fn new(run: &'a RunV1) -> Self {
        Self {
            run,
            logical: LogicalIndices::collect(run),
        }
    }

    fn run(&self) -> Run {
        let run = self.run;
        let has_automation =
            run.automation_id.is_some() || run.id.is_some() || run.stable_id.is_some();

        Run {
            tool: self.tool(),
            invocations: self.invocation().map(|i| vec![i]),
            artifacts: run.files.as_ref().map(|files| {
                files
                    .iter()
                    .map(|(key, file)| self.artifact(key, file))
                    .collect()
            }),
            logical_locations: run
                .logical_locations
                .as_ref()
                .map(|map| self.logical.to_v2_array(map)),
            results: run
                .results
                .as_ref()
                .map(|results| results.iter().map(|r| self.result(r)).collect()),
            automation_details: has_automation.then(|| RunAutomationDetails {
                id: run.automation_id.clone(),
                guid: run.id.clone(),
                correlation_guid: run.stable_id.clone(),
                properties: None,
            }),
            baseline_guid: run.baseline_id.clone(),
            column_kind: None,
            default_encoding: None,
            properties: carry_properties(&run.properties),
        }
    }

    fn tool(&self) -> Tool {
        let tool = &self.run.tool;
        let mut properties = carry_properties(&tool.properties);
        put_tags(&mut properties, &tool.tags);

        Tool {
            driver: ToolComponent {
                name: tool.name.clone(),
                full_name: tool.full_name.clone(),
                version: tool.version.clone(),
                semantic_version: tool.semantic_version.clone(),
                dotted_quad_file_version: tool.file_version.clone(),
                language: tool.language.clone(),
                rules: self.run.rules.as_ref().map(|rules| {
                    rules.values().map(|rule| self.rule(rule)).collect()
                }),
                properties,
            },
            extensions: None,
            properties: None,
        }
    }

    /// The single 2.1.0 invocation, also created to carry notifications
    /// when the 1.0.0 run has no invocation object.
    fn invocation(&self) -> Option<Invocation> {
        let run = self.run;
        let tool_notifications = run.tool_notifications.as_ref();
        let configuration_notifications = run.configuration_notifications.as_ref();
        if run.invocation.is_none()
            && tool_notifications.is_none()
            && configuration_notifications.is_none()
        {
            return None;
        }

        let execution_successful = !tool_notifications
            .into_iter()
            .flatten()
            .any(|n| n.level == Some(NotificationLevelV1::Error));

        let mut invocation = run
            .invocation
            .as_ref()
            .map(|i| self.invocation_fields(i))
            .unwrap_or_default();
        invocation.execution_successful = execution_successful;
        invocation.tool_execution_notifications = tool_notifications
            .map(|list| list.iter().map(|n| self.notification(n)).collect());
        invocation.tool_configuration_notifications = configuration_notifications
            .map(|list| list.iter().map(|n| self.notification(n)).collect());
        Some(invocation)
    }

    fn invocation_fields(&self, invocation: &InvocationV1) -> Invocation {
        Invocation {
            command_line: invocation.command_line.clone(),
            response_files: invocation.response_files.as_ref().map(|files| {
                files.keys().map(|uri| self.artifact_location(uri, None)).collect()
            }),
            start_time_utc: invocation.start_time.clone(),
            end_time_utc: invocation.end_time.clone(),
            machine: invocation.machine.clone(),
            account: invocation.account.clone(),
            process_id: invocation.process_id,
            executable_location: invocation
                .file_name
                .as_deref()
                .map(|uri| self.artifact_location(uri, None)),
            working_directory: invocation
                .working_directory
                .as_deref()
                .map(|uri| self.artifact_location(uri, None)),
            environment_variables: invocation.environment_variables.clone(),
            properties: carry_properties(&invocation.properties),
            ..Default::default()
        }
    }

    fn artifact(&self, key: &str, file: &FileDataV1) -> Artifact {
        let mut properties = carry_properties(&file.properties);
        put_tags(&mut properties, &file.tags);

        Artifact {
            location: Some(ArtifactLocation {
                uri: Some(file.uri.clone().unwrap_or_else(|| key.to_string())),
                uri_base_id: file.uri_base_id.clone(),
                ..Default::default()
            }),
            parent_index: file
                .parent_key
                .as_deref()
                .and_then(|parent| self.file_index(parent)),
            offset: file.offset,
            length: file.length,
            mime_type: file.mime_type.clone(),
            contents: file
                .contents
                .as_deref()
                .map(|encoded| decode_contents(encoded, file.mime_type.as_deref())),
            encoding: None,
            hashes: file.hashes.as_ref().map(|hashes| {
                hashes
                    .iter()
                    .map(|h| (hash_algorithm_name(&h.algorithm), h.value.clone()))
                    .collect()
            }),
            properties,
        }
    }

    fn rule(&self, rule: &RuleV1) -> ReportingDescriptor {
        let mut properties = carry_properties(&rule.properties);
        put_tags(&mut properties, &rule.tags);

        let enabled = rule.configuration.as_ref().and_then(|c| match c {
            RuleConfigurationV1::Enabled => Some(true),
            RuleConfigurationV1::Disabled => Some(false),
            RuleConfigurationV1::Unknown(raw) => {
                record_passthrough(&mut properties, SOURCE, "configuration", raw);
                None
            }
        });
        let level = rule.default_level.as_ref().and_then(|level| {
            if level.is_known() {
                Some(mapping::rule_default_level_to_v2(level))
            } else {
                record_passthrough(&mut properties, SOURCE, "defaultLevel", level.as_str());
                None
            }
        });

        ReportingDescriptor {
            id: rule.id.clone(),
            name: rule.name.clone(),
            short_description: rule
                .short_description
                .as_deref()
                .map(MultiformatMessageString::text),
            full_description: rule
                .full_description
                .as_deref()
                .map(MultiformatMessageString::text),
            message_strings: rule.message_formats.as_ref().map(|formats| {
                formats
                    .iter()
                    .map(|(k, v)| (k.clone(), MultiformatMessageString::text(v.as_str())))
                    .collect()
            }),
            default_configuration: (enabled.is_some() || level.is_some()).then(|| {
                ReportingConfiguration {
                    enabled,
                    level,
                    ..Default::default()
                }
            }),
            help_uri: rule.help_uri.clone(),
            properties,
        }
    }

    fn result(&self, result: &ResultV1) -> Result {
        let mut properties = carry_properties(&result.properties);
        put_tags(&mut properties, &result.tags);

        let (mut kind, mut level) = match result.level.as_ref() {
            Some(level) => {
                if !level.is_known() {
                    record_passthrough(&mut properties, SOURCE, "level", level.as_str());
                }
                mapping::result_level_to_v2(level)
            }
            None => (None, None),
        };
        if kind.is_none() {
            kind = passthrough_for(&result.properties, DEST, "kind").map(ResultKind::Unknown);
        }
        if level.is_none() {
            level = passthrough_for(&result.properties, DEST, "level").map(FailureLevel::Unknown);
        }

        let rule_key = result.rule_key.as_deref().or(result.rule_id.as_deref());
        let rule_index = rule_key.and_then(|key| self.rule_index(key));
        let rule_id = result.rule_id.clone().or_else(|| {
            rule_key
                .and_then(|key| self.run.rules.as_ref()?.get(key))
                .map(|rule| rule.id.clone())
        });

        let analysis_target = result
            .locations
            .iter()
            .flatten()
            .find_map(|l| l.analysis_target.as_ref())
            .and_then(|target| {
                let uri = target.uri.as_deref()?;
                Some(self.artifact_location(uri, target.uri_base_id.clone()))
            });

        let mut locations: Vec<Location> = result
            .locations
            .iter()
            .flatten()
            .filter_map(|l| self.location(l))
            .collect();
        if let (Some(snippet), Some(first)) = (&result.snippet, locations.first_mut()) {
            if let Some(physical) = first.physical_location.as_mut() {
                physical.region.get_or_insert_with(Region::default).snippet = Some(ArtifactContent {
                    text: Some(snippet.clone()),
                    ..Default::default()
                });
            }
        }

        let suppressions = result.suppression_states.as_ref().and_then(|states| {
            let (suppressions, unknown) = mapping::suppressions_to_v2(states);
            for raw in unknown {
                record_passthrough(&mut properties, SOURCE, "suppressionStates", &raw);
            }
            (!suppressions.is_empty()).then_some(suppressions)
        });

        let baseline_state = result.baseline_state.as_ref().and_then(|state| {
            let mapped = mapping::baseline_state_to_v2(state);
            if mapped.is_none() {
                record_passthrough(&mut properties, SOURCE, "baselineState", state.as_str());
            }
            mapped
        });

        Result {
            rule_id,
            rule_index,
            rule: None,
            kind,
            level,
            message: Message {
                text: result.message.clone(),
                id: result
                    .formatted_rule_message
                    .as_ref()
                    .map(|f| f.format_id.clone()),
                arguments: result
                    .formatted_rule_message
                    .as_ref()
                    .and_then(|f| f.arguments.clone()),
                ..Default::default()
            },
            analysis_target,
            locations: (!locations.is_empty()).then_some(locations),
            guid: result.id.clone(),
            partial_fingerprints: result.tool_fingerprint_contribution.as_ref().map(|value| {
                IndexMap::from([(TOOL_FINGERPRINT_KEY.to_string(), value.clone())])
            }),
            stacks: result
                .stacks
                .as_ref()
                .map(|stacks| stacks.iter().map(|s| self.stack(s)).collect()),
            code_flows: result
                .code_flows
                .as_ref()
                .map(|flows| flows.iter().map(|f| self.code_flow(f)).collect()),
            related_locations: result.related_locations.as_ref().map(|related| {
                related
                    .iter()
                    .map(|l| self.related_location(l))
                    .collect()
            }),
            suppressions,
            baseline_state,
            fixes: result
                .fixes
                .as_ref()
                .map(|fixes| fixes.iter().map(|f| self.fix(f)).collect()),
            properties,
        }
    }

    fn rule_index(&self, key: &str) -> Option<i64> {
        self.run
            .rules
            .as_ref()?
            .get_index_of(key)
            .and_then(|i| i64::try_from(i).ok())
    }

    /// `None` for a location that only named the analysis target.
    fn location(&self, location: &LocationV1) -> Option<Location> {
        let logical_locations = self.logical_reference(
            location.logical_location_key.as_deref(),
            location.fully_qualified_logical_name.as_deref(),
            location.decorated_name.as_deref(),
        );
        if location.result_file.is_none()
            && logical_locations.is_none()
            && location.properties.is_none()
        {
            return None;
        }

        Some(Location {
            physical_location: location.result_file.as_ref().map(|p| self.physical(p)),
            logical_locations,
            properties: carry_properties(&location.properties),
            ..Default::default()
        })
    }

    fn related_location(&self, location: &AnnotatedCodeLocationV1) -> Location {
        Location {
            id: location.id,
            physical_location: location.physical_location.as_ref().map(|p| self.physical(p)),
            logical_locations: self.logical_reference(
                location.logical_location_key.as_deref(),
                location.fully_qualified_logical_name.as_deref(),
                None,
            ),
            message: location.message.as_deref().map(Message::text),
            properties: carry_properties(&location.properties),
        }
    }

    fn logical_reference(
        &self,
        key: Option<&str>,
        fully_qualified_name: Option<&str>,
        decorated_name: Option<&str>,
    ) -> Option<Vec<LogicalLocation>> {
        let lookup = key.or(fully_qualified_name)?;
        let index = self.logical.index(lookup);
        let fully_qualified_name = fully_qualified_name
            .map(str::to_string)
            .or_else(|| index.map(|_| self.logical.fully_qualified_name(lookup).to_string()));

        Some(vec![LogicalLocation {
            index,
            fully_qualified_name,
            decorated_name: decorated_name.map(str::to_string),
            ..Default::default()
        }])
    }

    fn physical(&self, physical: &PhysicalLocationV1) -> PhysicalLocation {
        PhysicalLocation {
            artifact_location: physical
                .uri
                .as_deref()
                .map(|uri| self.artifact_location(uri, physical.uri_base_id.clone())),
            region: physical.region.as_ref().map(region_to_v2),
            ..Default::default()
        }
    }

    fn artifact_location(&self, uri: &str, uri_base_id: Option<String>) -> ArtifactLocation {
        ArtifactLocation {
            uri: Some(uri.to_string()),
            uri_base_id,
            index: self.file_index(uri),
            properties: None,
        }
    }

    /// Index of the file entry keyed by, or carrying, `uri`.
    fn file_index(&self, uri: &str) -> Option<i64> {
        let files = self.run.files.as_ref()?;
        files
            .get_index_of(uri)
            .or_else(|| files.values().position(|f| f.uri.as_deref() == Some(uri)))
            .and_then(|i| i64::try_from(i).ok())
    }

    fn stack(&self, stack: &StackV1) -> Stack {
        Stack {
            message: stack.message.as_deref().map(Message::text),
            frames: stack.frames.iter().map(|f| self.stack_frame(f)).collect(),
            properties: carry_properties(&stack.properties),
        }
    }

    fn stack_frame(&self, frame: &StackFrameV1) -> StackFrame {
        let region = frame.line.map(|line| Region {
            start_line: Some(line),
            start_column: frame.column,
            ..Default::default()
        });
        let address = (frame.address.is_some() || frame.offset.is_some()).then(|| Address {
            absolute_address: frame.address,
            offset_from_parent: frame.offset,
            ..Default::default()
        });
        let artifact_location = frame
            .uri
            .as_deref()
            .map(|uri| self.artifact_location(uri, frame.uri_base_id.clone()));

        let physical_location = (artifact_location.is_some()
            || region.is_some()
            || address.is_some())
        .then(|| PhysicalLocation {
            address,
            artifact_location,
            region,
            properties: None,
        });

        StackFrame {
            location: Some(Location {
                physical_location,
                logical_locations: self.logical_reference(
                    frame.logical_location_key.as_deref(),
                    frame.fully_qualified_logical_name.as_deref(),
                    None,
                ),
                message: frame.message.as_deref().map(Message::text),
                ..Default::default()
            }),
            module: frame.module.clone(),
            thread_id: frame.thread_id,
            parameters: frame.parameters.clone(),
            properties: carry_properties(&frame.properties),
        }
    }

    /// A 1.0.0 code flow is a flat list; it becomes a single thread flow.
    fn code_flow(&self, flow: &CodeFlowV1) -> CodeFlow {
        let thread_id = flow.locations.iter().find_map(|l| l.thread_id);
        let locations = flow
            .locations
            .iter()
            .map(|location| {
                let mut properties = carry_properties(&location.properties);
                let importance = match (&location.importance, location.essential) {
                    (Some(importance), _) => {
                        if !importance.is_known() {
                            record_passthrough(
                                &mut properties,
                                SOURCE,
                                "importance",
                                importance.as_str(),
                            );
                        }
                        Some(mapping::importance_to_v2(importance))
                    }
                    (None, Some(true)) => Some(ThreadFlowLocationImportance::Essential),
                    (None, _) => None,
                };

                ThreadFlowLocation {
                    location: Some(self.related_location(&AnnotatedCodeLocationV1 {
                        properties: None,
                        id: None,
                        ..location.clone()
                    })),
                    kinds: location.kind.clone().map(|k| vec![k]),
                    module: location.module.clone(),
                    nesting_level: None,
                    execution_order: location.step,
                    importance,
                    properties,
                }
            })
            .collect();

        CodeFlow {
            message: flow.message.as_deref().map(Message::text),
            thread_flows: vec![ThreadFlow {
                id: thread_id.map(|id| id.to_string()),
                message: None,
                locations,
                properties: None,
            }],
            properties: carry_properties(&flow.properties),
        }
    }

    fn notification(&self, notification: &NotificationV1) -> Notification {
        let mut properties = carry_properties(&notification.properties);
        let level = notification.level.as_ref().and_then(|level| {
            let mapped = mapping::notification_level_to_v2(level);
            if mapped.is_none() {
                record_passthrough(&mut properties, SOURCE, "level", level.as_str());
            }
            mapped
        });

        let rule_key = notification
            .rule_key
            .as_deref()
            .or(notification.rule_id.as_deref());
        let associated_rule = rule_key.map(|key| ReportingDescriptorReference {
            id: notification.rule_id.clone().or_else(|| Some(key.to_string())),
            index: self.rule_index(key),
            guid: None,
        });

        Notification {
            locations: notification.physical_location.as_ref().map(|p| {
                vec![Location {
                    physical_location: Some(self.physical(p)),
                    ..Default::default()
                }]
            }),
            message: Message {
                text: notification.message.clone(),
                ..Default::default()
            },
            level,
            thread_id: notification.thread_id,
            time_utc: notification.time.clone(),
            exception: notification.exception.as_ref().map(|e| self.exception(e)),
            descriptor: notification.id.as_ref().map(|id| ReportingDescriptorReference {
                id: Some(id.clone()),
                ..Default::default()
            }),
            associated_rule,
            properties,
        }
    }

    fn exception(&self, exception: &ExceptionDataV1) -> Exception {
        Exception {
            kind: exception.kind.clone(),
            message: exception.message.clone(),
            stack: exception.stack.as_ref().map(|s| self.stack(s)),
            inner_exceptions: exception
                .inner_exceptions
                .as_ref()
                .map(|inner| inner.iter().map(|e| self.exception(e)).collect()),
            properties: None,
        }
    }

    fn fix(&self, fix: &FixV1) -> Fix {
        Fix {
            description: fix.description.as_deref().map(Message::text),
            artifact_changes: fix
                .file_changes
                .iter()
                .map(|change| ArtifactChange {
                    artifact_location: match change.uri.as_deref() {
                        Some(uri) => self.artifact_location(uri, change.uri_base_id.clone()),
                        None => ArtifactLocation {
                            uri_base_id: change.uri_base_id.clone(),
                            ..Default::default()
                        },
                    },
                    replacements: change
                        .replacements
                        .iter()
                        .map(|replacement| Replacement {
                            deleted_region: Region {
                                byte_offset: replacement.offset,
                                byte_length: replacement.deleted_length,
                                ..Default::default()
                            },
                            inserted_content: replacement.inserted_bytes.as_ref().map(|bytes| {
                                ArtifactContent {
                                    binary: Some(bytes.clone()),
                                    ..Default::default()
                                }
                            }),
                            properties: None,
                        })
                        .collect(),
                    properties: None,
                })
                .collect(),
            properties: None,
        }
    }
}

/// 1.0.0 base64 contents. Text MIME types that decode to valid UTF-8 become
/// `text`; everything else is kept as `binary`.
fn decode_contents(encoded: &str, mime_type: Option<&str>) -> ArtifactContent {
    if mapping::is_text_mime_type(mime_type) {
        if let Some(text) = STANDARD
            .decode(encoded)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
        {
            return ArtifactContent {
                text: Some(text),
                ..Default::default()
            };
        }
    }
    ArtifactContent {
        binary: Some(encoded.to_string()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_from(json: &str) -> RunV1 {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_pass_level_becomes_pass_kind() {
        let run = run_from(r#"{"tool":{"name":"t"},"results":[{"level":"pass","message":"ok"}]}"#);
        let v2 = run_to_v2(&run);
        let result = &v2.results.as_ref().unwrap()[0];
        assert_eq!(result.kind, Some(ResultKind::Pass));
        assert_eq!(result.level, Some(FailureLevel::None));
        assert_eq!(result.message.text.as_deref(), Some("ok"));
    }

    #[test]
    fn test_rule_key_resolves_index() {
        let run = run_from(
            r#"{
                "tool": {"name": "t"},
                "rules": {"C1": {"id": "C1"}, "C1-0": {"id": "C1", "defaultLevel": "error"}},
                "results": [{"ruleId": "C1", "ruleKey": "C1-0", "message": "m"}]
            }"#,
        );
        let v2 = run_to_v2(&run);
        let result = &v2.results.as_ref().unwrap()[0];
        assert_eq!(result.rule_id.as_deref(), Some("C1"));
        assert_eq!(result.rule_index, Some(1));

        let rules = v2.rules();
        assert_eq!(
            rules[1].default_configuration.as_ref().unwrap().level,
            Some(FailureLevel::Error)
        );
    }

    #[test]
    fn test_text_file_contents_are_decoded() {
        let run = run_from(
            r#"{
                "tool": {"name": "t"},
                "files": {
                    "file:///a.txt": {"mimeType": "text/plain", "contents": "aGVsbG8="},
                    "file:///a.bin": {"mimeType": "application/octet-stream", "contents": "AAE="}
                }
            }"#,
        );
        let v2 = run_to_v2(&run);
        let artifacts = v2.artifacts.as_ref().unwrap();
        assert_eq!(
            artifacts[0].contents.as_ref().unwrap().text.as_deref(),
            Some("hello")
        );
        assert_eq!(
            artifacts[1].contents.as_ref().unwrap().binary.as_deref(),
            Some("AAE=")
        );
    }

    #[test]
    fn test_error_notification_marks_execution_failed() {
        let run = run_from(
            r#"{
                "tool": {"name": "t"},
                "toolNotifications": [{"message": "crashed", "level": "error"}]
            }"#,
        );
        let v2 = run_to_v2(&run);
        let invocation = &v2.invocations.as_ref().unwrap()[0];
        assert!(!invocation.execution_successful);
        assert_eq!(
            invocation.tool_execution_notifications.as_ref().unwrap()[0]
                .message
                .text
                .as_deref(),
            Some("crashed")
        );
    }

    #[test]
    fn test_snippet_lands_on_first_region() {
        let run = run_from(
            r#"{
                "tool": {"name": "t"},
                "results": [{
                    "message": "m",
                    "snippet": "int x;",
                    "locations": [{"resultFile": {"uri": "file:///a.c", "region": {"startLine": 2}}}]
                }]
            }"#,
        );
        let v2 = run_to_v2(&run);
        let location = &v2.results.as_ref().unwrap()[0].locations.as_ref().unwrap()[0];
        let region = location.physical_location.as_ref().unwrap().region.as_ref().unwrap();
        assert_eq!(region.start_line, Some(2));
        assert_eq!(region.snippet.as_ref().unwrap().text.as_deref(), Some("int x;"));
    }

    #[test]
    fn test_unknown_baseline_state_recorded() {
        let run = run_from(
            r#"{"tool":{"name":"t"},"results":[{"message":"m","baselineState":"resurrected"}]}"#,
        );
        let v2 = run_to_v2(&run);
        let result = &v2.results.as_ref().unwrap()[0];
        assert_eq!(result.baseline_state, None);
        assert_eq!(
            result
                .properties
                .as_ref()
                .unwrap()
                .get_as::<String>("sarifv1/baselineState")
                .as_deref(),
            Some("resurrected")
        );
    }
}
