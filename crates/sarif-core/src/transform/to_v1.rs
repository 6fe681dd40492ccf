//! 2.1.0 → 1.0.0.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;

use super::codec;
use super::logical::{unique_keys, LogicalKeys};
use super::mapping::{self, hash_algorithm_kind, passthrough_for, record_passthrough, take_tags};
use super::region::{region_to_v1, ArtifactHint};
use super::TOOL_FINGERPRINT_KEY;
use crate::model::property_bag::carry_properties;
use crate::model::v1::{
    AnnotatedCodeLocationV1, CodeFlowV1, ExceptionDataV1, FileChangeV1, FileDataV1, FixV1,
    FormattedRuleMessageV1, HashV1, InvocationV1, LocationV1, NotificationV1, PhysicalLocationV1,
    ReplacementV1, ResultLevelV1, ResultV1, RuleConfigurationV1, RuleV1, RunV1, StackFrameV1,
    StackV1, ToolV1,
};
use crate::model::v2::{
    Artifact, ArtifactContent, ArtifactLocation, CodeFlow, Exception, Fix, Invocation, Location,
    LogicalLocation, Notification, PhysicalLocation, ReportingDescriptor, Result, Run, Stack,
    ToolComponent,
};
use crate::version::SarifVersion;

const SOURCE: SarifVersion = SarifVersion::Current;
const DEST: SarifVersion = SarifVersion::OneZeroZero;

/// Converts one run. A run carrying a 1.0.0 stash is restored from it;
/// otherwise it is converted field by field and its own pre-image is stashed.
pub fn run_to_v1(run: &Run) -> RunV1 {
    if let Some(mut bag) = run.properties.clone() {
        if let Some(mut restored) = codec::try_restore::<RunV1>(&mut bag, DEST) {
            if let Some(props) = restored.properties.as_mut() {
                props.strip_run_stashes();
            }
            return restored;
        }
    }

    let mut converted = ToV1::new(run).run();

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

struct ToV1<'a> {
    run: &'a Run,
    logical: LogicalKeys,
    rule_keys: Vec<String>,
    file_keys: Vec<String>,
}

impl<'a> ToV1<'a> {
    fn new(run: &'a Run) -> Self {
        let logical = LogicalKeys::build(run.logical_locations.as_deref().unwrap_or(&[]));
        let rule_keys = unique_keys(run.rules().iter().map(|r| r.id.clone()));
        let file_keys = file_keys(run.artifacts.as_deref().unwrap_or(&[]));
        Self {
            run,
            logical,
            rule_keys,
            file_keys,
        }
    }

    fn run(&self) -> RunV1 {
        let run = self.run;
        let automation = run.automation_details.as_ref();

        let invocations = run.invocations.as_deref().unwrap_or(&[]);
        let tool_notifications = collect_notifications(invocations, |i| {
            i.tool_execution_notifications.as_deref()
        });
        let configuration_notifications = collect_notifications(invocations, |i| {
            i.tool_configuration_notifications.as_deref()
        });

        RunV1 {
            tool: self.tool(&run.tool.driver),
            invocation: invocations.first().map(|i| self.invocation(i)),
            files: run.artifacts.as_ref().map(|artifacts| {
                artifacts
                    .iter()
                    .enumerate()
                    .map(|(i, a)| (self.file_keys[i].clone(), self.file(a)))
                    .collect()
            }),
            logical_locations: run
                .logical_locations
                .as_ref()
                .map(|locations| self.logical.to_v1_map(locations)),
            results: run
                .results
                .as_ref()
                .map(|results| results.iter().map(|r| self.result(r)).collect()),
            tool_notifications: tool_notifications
                .map(|n| n.into_iter().map(|n| self.notification(n)).collect()),
            configuration_notifications: configuration_notifications
                .map(|n| n.into_iter().map(|n| self.notification(n)).collect()),
            rules: run.tool.driver.rules.as_ref().map(|rules| {
                rules
                    .iter()
                    .zip(&self.rule_keys)
                    .map(|(rule, key)| (key.clone(), self.rule(rule)))
                    .collect()
            }),
            id: automation.and_then(|a| a.guid.clone()),
            stable_id: automation.and_then(|a| a.correlation_guid.clone()),
            automation_id: automation.and_then(|a| a.id.clone()),
            baseline_id: run.baseline_guid.clone(),
            architecture: None,
            properties: carry_properties(&run.properties),
        }
    }

    fn tool(&self, driver: &ToolComponent) -> ToolV1 {
        let mut properties = carry_properties(&driver.properties);
        let tags = take_tags(&mut properties);
        ToolV1 {
            name: driver.name.clone(),
            full_name: driver.full_name.clone(),
            version: driver.version.clone(),
            semantic_version: driver.semantic_version.clone(),
            file_version: driver.dotted_quad_file_version.clone(),
            sarif_logger_version: None,
            language: driver.language.clone(),
            tags,
            properties,
        }
    }

    fn invocation(&self, invocation: &Invocation) -> InvocationV1 {
        InvocationV1 {
            command_line: invocation.command_line.clone(),
            response_files: None,
            start_time: invocation.start_time_utc.clone(),
            end_time: invocation.end_time_utc.clone(),
            machine: invocation.machine.clone(),
            account: invocation.account.clone(),
            process_id: invocation.process_id,
            file_name: invocation
                .executable_location
                .as_ref()
                .and_then(|l| self.artifact_uri(l)),
            working_directory: invocation
                .working_directory
                .as_ref()
                .and_then(|l| self.artifact_uri(l)),
            environment_variables: invocation.environment_variables.clone(),
            properties: carry_properties(&invocation.properties),
        }
    }

    fn file(&self, artifact: &Artifact) -> FileDataV1 {
        let mut properties = carry_properties(&artifact.properties);
        let tags = take_tags(&mut properties);
        let location = artifact.location.as_ref();

        FileDataV1 {
            uri: location.and_then(|l| l.uri.clone()),
            uri_base_id: location.and_then(|l| l.uri_base_id.clone()),
            parent_key: artifact
                .parent_index
                .and_then(|p| usize::try_from(p).ok())
                .and_then(|p| self.file_keys.get(p).cloned()),
            offset: artifact.offset,
            length: artifact.length,
            mime_type: artifact.mime_type.clone(),
            contents: artifact.contents.as_ref().and_then(encode_contents),
            hashes: artifact.hashes.as_ref().map(|hashes| {
                hashes
                    .iter()
                    .map(|(name, value)| HashV1 {
                        value: value.clone(),
                        algorithm: hash_algorithm_kind(name),
                    })
                    .collect()
            }),
            tags,
            properties,
        }
    }

    fn rule(&self, rule: &ReportingDescriptor) -> RuleV1 {
        let mut properties = carry_properties(&rule.properties);
        let tags = take_tags(&mut properties);
        let configuration = rule.default_configuration.as_ref();

        let mut default_level = None;
        if let Some(level) = configuration.and_then(|c| c.level.as_ref()) {
            if level.is_known() {
                default_level = Some(mapping::rule_default_level_to_v1(level));
            } else {
                record_passthrough(&mut properties, SOURCE, "defaultLevel", level.as_str());
            }
        }

        RuleV1 {
            id: rule.id.clone(),
            name: rule.name.clone(),
            short_description: rule.short_description.as_ref().map(|d| d.text.clone()),
            full_description: rule.full_description.as_ref().map(|d| d.text.clone()),
            message_formats: rule.message_strings.as_ref().map(|strings| {
                strings
                    .iter()
                    .map(|(k, v)| (k.clone(), v.text.clone()))
                    .collect()
            }),
            configuration: configuration.and_then(|c| c.enabled).map(|enabled| {
                if enabled {
                    RuleConfigurationV1::Enabled
                } else {
                    RuleConfigurationV1::Disabled
                }
            }),
            default_level,
            help_uri: rule.help_uri.clone(),
            tags,
            properties,
        }
    }

    fn result(&self, result: &Result) -> ResultV1 {
        let mut properties = carry_properties(&result.properties);
        let tags = take_tags(&mut properties);

        let (rule_id, rule_key) = self.rule_reference(result.resolved_rule_id(), result.resolved_rule_index());

        for (field, value) in [
            ("kind", result.kind.as_ref().map(|k| (k.is_known(), k.as_str()))),
            ("level", result.level.as_ref().map(|l| (l.is_known(), l.as_str()))),
        ] {
            if let Some((false, raw)) = value {
                record_passthrough(&mut properties, SOURCE, field, raw);
            }
        }
        let mut level = mapping::result_level_to_v1(result.kind.as_ref(), result.level.as_ref());
        if matches!(level, None | Some(ResultLevelV1::Default)) {
            if let Some(raw) = passthrough_for(&result.properties, DEST, "level") {
                level = Some(ResultLevelV1::Unknown(raw));
            }
        }

        let analysis_target = result
            .analysis_target
            .as_ref()
            .map(|target| PhysicalLocationV1 {
                uri: self.artifact_uri(target),
                uri_base_id: target.uri_base_id.clone(),
                region: None,
            });

        let mut locations: Option<Vec<LocationV1>> = result.locations.as_ref().map(|locations| {
            locations
                .iter()
                .map(|l| self.location(l, analysis_target.clone()))
                .collect()
        });
        if let (Some(target), None) = (&analysis_target, &locations) {
            locations = Some(vec![LocationV1 {
                analysis_target: Some(target.clone()),
                ..Default::default()
            }]);
        }

        let snippet = result
            .locations
            .as_ref()
            .and_then(|l| l.first())
            .and_then(|l| l.physical_location.as_ref())
            .and_then(|p| p.region.as_ref())
            .and_then(|r| r.snippet.as_ref())
            .and_then(|s| s.text.clone());

        let suppression_states = result.suppressions.as_ref().and_then(|suppressions| {
            let (states, unknown) = mapping::suppressions_to_v1(suppressions);
            for raw in unknown {
                record_passthrough(&mut properties, SOURCE, "suppressions", &raw);
            }
            (!states.is_empty()).then_some(states)
        });

        let baseline_state = result.baseline_state.as_ref().and_then(|state| {
            let mapped = mapping::baseline_state_to_v1(state);
            if mapped.is_none() {
                record_passthrough(&mut properties, SOURCE, "baselineState", state.as_str());
            }
            mapped
        });

        ResultV1 {
            rule_id,
            rule_key,
            level,
            message: result.message.text.clone(),
            formatted_rule_message: result.message.id.as_ref().map(|id| FormattedRuleMessageV1 {
                format_id: id.clone(),
                arguments: result.message.arguments.clone(),
            }),
            locations,
            snippet,
            id: result.guid.clone(),
            tool_fingerprint_contribution: result
                .partial_fingerprints
                .as_ref()
                .and_then(|f| f.get(TOOL_FINGERPRINT_KEY).cloned()),
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
                    .map(|l| self.annotated_location(l))
                    .collect()
            }),
            suppression_states,
            baseline_state,
            fixes: result
                .fixes
                .as_ref()
                .map(|fixes| fixes.iter().map(|f| self.fix(f)).collect()),
            tags,
            properties,
        }
    }

    /// `(ruleId, ruleKey)`; the key is only written when it differs from the id.
    fn rule_reference(&self, id: Option<&str>, index: Option<i64>) -> (Option<String>, Option<String>) {
        let position = index.and_then(|i| usize::try_from(i).ok());
        match position.and_then(|p| Some((self.run.rules().get(p)?, self.rule_keys.get(p)?))) {
            Some((rule, key)) => {
                let rule_id = id.map(str::to_string).unwrap_or_else(|| rule.id.clone());
                let rule_key = (*key != rule_id).then(|| key.clone());
                (Some(rule_id), rule_key)
            }
            None => (id.map(str::to_string), None),
        }
    }

    fn location(&self, location: &Location, analysis_target: Option<PhysicalLocationV1>) -> LocationV1 {
        let logical = self.logical_reference(location.logical_locations.as_deref());
        LocationV1 {
            analysis_target,
            result_file: location.physical_location.as_ref().map(|p| self.physical(p)),
            fully_qualified_logical_name: logical.fully_qualified_name,
            logical_location_key: logical.key,
            decorated_name: logical.decorated_name,
            properties: carry_properties(&location.properties),
        }
    }

    fn annotated_location(&self, location: &Location) -> AnnotatedCodeLocationV1 {
        let logical = self.logical_reference(location.logical_locations.as_deref());
        AnnotatedCodeLocationV1 {
            id: location.id,
            physical_location: location.physical_location.as_ref().map(|p| self.physical(p)),
            fully_qualified_logical_name: logical.fully_qualified_name,
            logical_location_key: logical.key,
            message: location.message.as_ref().and_then(|m| m.text.clone()),
            properties: carry_properties(&location.properties),
            ..Default::default()
        }
    }

    fn logical_reference(&self, references: Option<&[LogicalLocation]>) -> LogicalReferenceV1 {
        let Some(reference) = references.and_then(|r| r.first()) else {
            return LogicalReferenceV1::default();
        };

        let entry = reference.index.and_then(|i| {
            let position = usize::try_from(i).ok()?;
            self.run.logical_locations.as_ref()?.get(position)
        });
        let key = reference.index.and_then(|i| self.logical.key(i));

        let fully_qualified_name = reference
            .fully_qualified_name
            .clone()
            .or_else(|| entry.and_then(|e| e.fully_qualified_name.clone()))
            .or_else(|| entry.and_then(|e| e.name.clone()))
            .or_else(|| key.map(str::to_string))
            .or_else(|| reference.name.clone());

        LogicalReferenceV1 {
            key: key
                .filter(|k| fully_qualified_name.as_deref() != Some(*k))
                .map(str::to_string),
            fully_qualified_name,
            decorated_name: reference
                .decorated_name
                .clone()
                .or_else(|| entry.and_then(|e| e.decorated_name.clone())),
        }
    }

    fn physical(&self, physical: &PhysicalLocation) -> PhysicalLocationV1 {
        let artifact_location = physical.artifact_location.as_ref();
        let artifact = artifact_location.and_then(|l| self.artifact_for(l));
        PhysicalLocationV1 {
            uri: artifact_location.and_then(|l| self.artifact_uri(l)),
            uri_base_id: artifact_location.and_then(|l| {
                l.uri_base_id.clone().or_else(|| {
                    artifact
                        .and_then(|a| a.location.as_ref())
                        .and_then(|a| a.uri_base_id.clone())
                })
            }),
            region: physical
                .region
                .as_ref()
                .map(|r| region_to_v1(r, self.hint(artifact))),
        }
    }

    fn hint(&self, artifact: Option<&'a Artifact>) -> ArtifactHint<'a> {
        ArtifactHint {
            encoding: artifact
                .and_then(|a| a.encoding.as_deref())
                .or(self.run.default_encoding.as_deref()),
            text: artifact
                .and_then(|a| a.contents.as_ref())
                .and_then(|c| c.text.as_deref()),
        }
    }

    /// The run artifact a location refers to, by index or by URI.
    fn artifact_for(&self, location: &ArtifactLocation) -> Option<&'a Artifact> {
        let artifacts = self.run.artifacts.as_deref()?;
        if let Some(index) = location.index {
            return artifacts.get(usize::try_from(index).ok()?);
        }
        let uri = location.uri.as_deref()?;
        artifacts
            .iter()
            .find(|a| a.location.as_ref().and_then(|l| l.uri.as_deref()) == Some(uri))
    }

    fn artifact_uri(&self, location: &ArtifactLocation) -> Option<String> {
        location.uri.clone().or_else(|| {
            self.artifact_for(location)
                .and_then(|a| a.location.as_ref())
                .and_then(|l| l.uri.clone())
        })
    }

    fn stack(&self, stack: &Stack) -> StackV1 {
        StackV1 {
            message: stack.message.as_ref().and_then(|m| m.text.clone()),
            frames: stack
                .frames
                .iter()
                .map(|frame| {
                    let location = frame.location.as_ref();
                    let physical = location.and_then(|l| l.physical_location.as_ref());
                    let region = physical.and_then(|p| p.region.as_ref());
                    let address = physical.and_then(|p| p.address.as_ref());
                    let artifact_location = physical.and_then(|p| p.artifact_location.as_ref());
                    let logical = self.logical_reference(
                        location.and_then(|l| l.logical_locations.as_deref()),
                    );

                    StackFrameV1 {
                        message: location
                            .and_then(|l| l.message.as_ref())
                            .and_then(|m| m.text.clone()),
                        uri: artifact_location.and_then(|l| self.artifact_uri(l)),
                        uri_base_id: artifact_location.and_then(|l| l.uri_base_id.clone()),
                        line: region.and_then(|r| r.start_line),
                        column: region.and_then(|r| r.start_column),
                        module: frame.module.clone(),
                        thread_id: frame.thread_id,
                        fully_qualified_logical_name: logical.fully_qualified_name,
                        logical_location_key: logical.key,
                        address: address.and_then(|a| a.absolute_address),
                        offset: address.and_then(|a| a.offset_from_parent),
                        parameters: frame.parameters.clone(),
                        properties: carry_properties(&frame.properties),
                    }
                })
                .collect(),
            properties: carry_properties(&stack.properties),
        }
    }

    fn code_flow(&self, flow: &CodeFlow) -> CodeFlowV1 {
        let mut locations = Vec::new();
        for thread_flow in &flow.thread_flows {
            let thread_id = thread_flow.id.as_deref().and_then(|id| id.parse::<i64>().ok());
            for tfl in &thread_flow.locations {
                let mut properties = carry_properties(&tfl.properties);
                let importance = tfl.importance.as_ref().map(|importance| {
                    if !importance.is_known() {
                        record_passthrough(&mut properties, SOURCE, "importance", importance.as_str());
                    }
                    mapping::importance_to_v1(importance)
                });

                let location = tfl.location.as_ref();
                let logical =
                    self.logical_reference(location.and_then(|l| l.logical_locations.as_deref()));
                locations.push(AnnotatedCodeLocationV1 {
                    step: tfl.execution_order,
                    physical_location: location
                        .and_then(|l| l.physical_location.as_ref())
                        .map(|p| self.physical(p)),
                    fully_qualified_logical_name: logical.fully_qualified_name,
                    logical_location_key: logical.key,
                    module: tfl.module.clone(),
                    thread_id,
                    message: location
                        .and_then(|l| l.message.as_ref())
                        .and_then(|m| m.text.clone()),
                    kind: tfl.kinds.as_ref().and_then(|k| k.first().cloned()),
                    importance,
                    properties,
                    ..Default::default()
                });
            }
        }

        CodeFlowV1 {
            message: flow.message.as_ref().and_then(|m| m.text.clone()),
            locations,
            properties: carry_properties(&flow.properties),
        }
    }

    fn notification(&self, notification: &Notification) -> NotificationV1 {
        let mut properties = carry_properties(&notification.properties);
        let level = notification.level.as_ref().map(|level| {
            if !level.is_known() {
                record_passthrough(&mut properties, SOURCE, "level", level.as_str());
            }
            mapping::notification_level_to_v1(level)
        });

        let associated = notification.associated_rule.as_ref();
        let (rule_id, rule_key) = match associated {
            Some(rule) => self.rule_reference(rule.id.as_deref(), rule.index),
            None => (None, None),
        };

        NotificationV1 {
            id: notification.descriptor.as_ref().and_then(|d| d.id.clone()),
            rule_id,
            rule_key,
            physical_location: notification
                .locations
                .as_ref()
                .and_then(|l| l.first())
                .and_then(|l| l.physical_location.as_ref())
                .map(|p| self.physical(p)),
            message: notification.message.text.clone(),
            level,
            thread_id: notification.thread_id,
            time: notification.time_utc.clone(),
            exception: notification.exception.as_ref().map(|e| self.exception(e)),
            properties,
        }
    }

    fn exception(&self, exception: &Exception) -> ExceptionDataV1 {
        ExceptionDataV1 {
            kind: exception.kind.clone(),
            message: exception.message.clone(),
            stack: exception.stack.as_ref().map(|s| self.stack(s)),
            inner_exceptions: exception
                .inner_exceptions
                .as_ref()
                .map(|inner| inner.iter().map(|e| self.exception(e)).collect()),
        }
    }

    fn fix(&self, fix: &Fix) -> FixV1 {
        FixV1 {
            description: fix.description.as_ref().and_then(|d| d.text.clone()),
            file_changes: fix
                .artifact_changes
                .iter()
                .map(|change| {
                    let artifact = self.artifact_for(&change.artifact_location);
                    FileChangeV1 {
                        uri: self.artifact_uri(&change.artifact_location),
                        uri_base_id: change.artifact_location.uri_base_id.clone(),
                        replacements: change
                            .replacements
                            .iter()
                            .map(|replacement| {
                                let deleted =
                                    region_to_v1(&replacement.deleted_region, self.hint(artifact));
                                ReplacementV1 {
                                    offset: deleted.offset,
                                    deleted_length: deleted.length,
                                    inserted_bytes: replacement
                                        .inserted_content
                                        .as_ref()
                                        .and_then(encode_contents),
                                }
                            })
                            .collect(),
                    }
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
struct LogicalReferenceV1 {
    fully_qualified_name: Option<String>,
    key: Option<String>,
    decorated_name: Option<String>,
}

/// 1.0.0 file keys: the artifact URI, prefixed with `parent#` for nested
/// artifacts whose parent precedes them, then made unique.
fn file_keys(artifacts: &[Artifact]) -> Vec<String> {
    let mut bases: Vec<String> = Vec::with_capacity(artifacts.len());
    for (index, artifact) in artifacts.iter().enumerate() {
        let uri = artifact
            .location
            .as_ref()
            .and_then(|l| l.uri.clone())
            .unwrap_or_else(|| index.to_string());
        let parent = artifact
            .parent_index
            .and_then(|p| usize::try_from(p).ok())
            .filter(|p| *p < index)
            .and_then(|p| bases.get(p));
        let base = match parent {
            Some(parent) => format!("{parent}#{uri}"),
            None => uri,
        };
        bases.push(base);
    }
    unique_keys(bases)
}

fn collect_notifications<'r>(
    invocations: &'r [Invocation],
    select: impl Fn(&'r Invocation) -> Option<&'r [Notification]>,
) -> Option<Vec<&'r Notification>> {
    let mut found = false;
    let mut notifications = Vec::new();
    for invocation in invocations {
        if let Some(list) = select(invocation) {
            found = true;
            notifications.extend(list);
        }
    }
    found.then_some(notifications)
}

/// Base64 of the content bytes; text is encoded as UTF-8.
fn encode_contents(content: &ArtifactContent) -> Option<String> {
    content
        .binary
        .clone()
        .or_else(|| content.text.as_ref().map(|t| STANDARD.encode(t.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::v2::{FailureLevel, Message, ResultKind};

    fn run_from(json: &str) -> Run {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rule_key_only_written_when_it_differs() {
        let run = run_from(
            r#"{
                "tool": {"driver": {"name": "t", "rules": [{"id": "R1"}, {"id": "R1"}]}},
                "results": [
                    {"ruleId": "R1", "ruleIndex": 0, "message": {"text": "a"}},
                    {"ruleId": "R1", "ruleIndex": 1, "message": {"text": "b"}}
                ]
            }"#,
        );
        let v1 = run_to_v1(&run);
        let rules = v1.rules.as_ref().unwrap();
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["R1", "R1-0"]);

        let results = v1.results.as_ref().unwrap();
        assert_eq!(results[0].rule_key, None);
        assert_eq!(results[1].rule_id.as_deref(), Some("R1"));
        assert_eq!(results[1].rule_key.as_deref(), Some("R1-0"));
    }

    #[test]
    fn test_pass_kind_maps_to_pass_level() {
        let result = Result {
            kind: Some(ResultKind::Pass),
            level: Some(FailureLevel::None),
            message: Message::text("ok"),
            ..Default::default()
        };
        let run = Run {
            results: Some(vec![result]),
            ..Default::default()
        };
        let v1 = run_to_v1(&run);
        assert_eq!(
            v1.results.unwrap()[0].level,
            Some(ResultLevelV1::Pass)
        );
    }

    #[test]
    fn test_unknown_level_recorded_in_result_bag() {
        let run = run_from(
            r#"{"tool":{"driver":{"name":"t"}},"results":[{"level":"fatal","message":{"text":"x"}}]}"#,
        );
        let v1 = run_to_v1(&run);
        let result = &v1.results.as_ref().unwrap()[0];
        assert_eq!(result.level, Some(ResultLevelV1::Default));
        assert_eq!(
            result.properties.as_ref().unwrap().get_raw("sarifv2/level"),
            Some(r#""fatal""#)
        );
    }

    #[test]
    fn test_region_uses_artifact_encoding() {
        let run = run_from(
            r#"{
                "tool": {"driver": {"name": "t"}},
                "artifacts": [{"location": {"uri": "file:///src/a.cs"}, "encoding": "utf-16"}],
                "results": [{
                    "message": {"text": "x"},
                    "locations": [{"physicalLocation": {
                        "artifactLocation": {"index": 0},
                        "region": {"charOffset": 8}
                    }}]
                }]
            }"#,
        );
        let v1 = run_to_v1(&run);
        let location = &v1.results.as_ref().unwrap()[0].locations.as_ref().unwrap()[0];
        let file = location.result_file.as_ref().unwrap();
        assert_eq!(file.uri.as_deref(), Some("file:///src/a.cs"));
        assert_eq!(
            serde_json::to_string(file.region.as_ref().unwrap()).unwrap(),
            r#"{"offset":16}"#
        );
    }

    #[test]
    fn test_nested_file_keys() {
        let artifacts = vec![
            Artifact {
                location: Some(ArtifactLocation {
                    uri: Some("file:///a.zip".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Artifact {
                location: Some(ArtifactLocation {
                    uri: Some("/inner.txt".into()),
                    ..Default::default()
                }),
                parent_index: Some(0),
                ..Default::default()
            },
        ];
        assert_eq!(
            file_keys(&artifacts),
            vec!["file:///a.zip", "file:///a.zip#/inner.txt"]
        );
    }

    #[test]
    fn test_fix_without_byte_data_leaves_fields_absent() {
        let run = run_from(
            r#"{
                "tool": {"driver": {"name": "t"}},
                "results": [{
                    "message": {"text": "m"},
                    "fixes": [{
                        "artifactChanges": [{
                            "artifactLocation": {"uri": "file:///a.c"},
                            "replacements": [{
                                "deletedRegion": {"startLine": 3, "startColumn": 2, "endColumn": 5}
                            }]
                        }]
                    }]
                }]
            }"#,
        );
        let v1 = run_to_v1(&run);
        let fixes = v1.results.as_ref().unwrap()[0].fixes.as_ref().unwrap();
        assert_eq!(fixes[0].description, None);
        assert_eq!(fixes[0].file_changes[0].uri.as_deref(), Some("file:///a.c"));
        assert_eq!(fixes[0].file_changes[0].replacements[0].offset, None);
        assert_eq!(
            serde_json::to_string(fixes).unwrap(),
            r#"[{"fileChanges":[{"uri":"file:///a.c","replacements":[{}]}]}]"#
        );
    }

    #[test]
    fn test_notification_with_only_message_id_has_no_text() {
        let run = run_from(
            r#"{
                "tool": {"driver": {"name": "t"}},
                "invocations": [{
                    "executionSuccessful": true,
                    "toolExecutionNotifications": [{"message": {"id": "n1"}}]
                }]
            }"#,
        );
        let v1 = run_to_v1(&run);
        let notification = &v1.tool_notifications.as_ref().unwrap()[0];
        assert_eq!(notification.message, None);
    }

    #[test]
    fn test_text_contents_become_base64() {
        let content = ArtifactContent {
            text: Some("hello".into()),
            ..Default::default()
        };
        assert_eq!(encode_contents(&content).as_deref(), Some("aGVsbG8="));
    }
}
