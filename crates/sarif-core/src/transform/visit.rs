//! Ordered walk over the reference-bearing nodes of a 1.0.0 run.
//!
//! The walk order defines "encounter order" for anything that is numbered
//! while converting to 2.1.0: results first (locations, related locations,
//! stacks, code flows), then tool notifications, then configuration
//! notifications.

use crate::model::v1::{
    AnnotatedCodeLocationV1, ExceptionDataV1, LocationV1, NotificationV1, ResultV1, RunV1,
    StackFrameV1, StackV1,
};

#[derive(Debug, Clone, Copy)]
pub enum NodeV1<'a> {
    Result(&'a ResultV1),
    Location(&'a LocationV1),
    AnnotatedCodeLocation(&'a AnnotatedCodeLocationV1),
    StackFrame(&'a StackFrameV1),
    Notification(&'a NotificationV1),
}

impl<'a> NodeV1<'a> {
    /// Logical location reference as `(logicalLocationKey, fullyQualifiedLogicalName)`.
    pub fn logical_reference(&self) -> Option<(Option<&'a str>, Option<&'a str>)> {
        let (key, fqln) = match *self {
            NodeV1::Location(l) => (
                l.logical_location_key.as_deref(),
                l.fully_qualified_logical_name.as_deref(),
            ),
            NodeV1::AnnotatedCodeLocation(a) => (
                a.logical_location_key.as_deref(),
                a.fully_qualified_logical_name.as_deref(),
            ),
            NodeV1::StackFrame(f) => (
                f.logical_location_key.as_deref(),
                f.fully_qualified_logical_name.as_deref(),
            ),
            NodeV1::Result(_) | NodeV1::Notification(_) => return None,
        };
        if key.is_none() && fqln.is_none() {
            None
        } else {
            Some((key, fqln))
        }
    }
}

pub fn walk_run_v1<'a>(run: &'a RunV1, visit: &mut impl FnMut(NodeV1<'a>)) {
    for result in run.results.iter().flatten() {
        walk_result(result, visit);
    }
    for notification in run
        .tool_notifications
        .iter()
        .flatten()
        .chain(run.configuration_notifications.iter().flatten())
    {
        visit(NodeV1::Notification(notification));
        if let Some(exception) = &notification.exception {
            walk_exception(exception, visit);
        }
    }
}

fn walk_result<'a>(result: &'a ResultV1, visit: &mut impl FnMut(NodeV1<'a>)) {
    visit(NodeV1::Result(result));
    for location in result.locations.iter().flatten() {
        visit(NodeV1::Location(location));
    }
    for related in result.related_locations.iter().flatten() {
        visit(NodeV1::AnnotatedCodeLocation(related));
    }
    for stack in result.stacks.iter().flatten() {
        walk_stack(stack, visit);
    }
    for flow in result.code_flows.iter().flatten() {
        for location in &flow.locations {
            visit(NodeV1::AnnotatedCodeLocation(location));
        }
    }
}

fn walk_stack<'a>(stack: &'a StackV1, visit: &mut impl FnMut(NodeV1<'a>)) {
    for frame in &stack.frames {
        visit(NodeV1::StackFrame(frame));
    }
}

fn walk_exception<'a>(exception: &'a ExceptionDataV1, visit: &mut impl FnMut(NodeV1<'a>)) {
    if let Some(stack) = &exception.stack {
        walk_stack(stack, visit);
    }
    for inner in exception.inner_exceptions.iter().flatten() {
        walk_exception(inner, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_before_notifications() {
        let run: RunV1 = serde_json::from_str(
            r#"{
                "tool": {"name": "t"},
                "results": [{
                    "locations": [{"fullyQualifiedLogicalName": "A"}],
                    "stacks": [{"frames": [{"fullyQualifiedLogicalName": "B"}]}],
                    "codeFlows": [{"locations": [{"logicalLocationKey": "C"}]}]
                }],
                "toolNotifications": [{
                    "message": "boom",
                    "exception": {"stack": {"frames": [{"fullyQualifiedLogicalName": "D"}]}}
                }]
            }"#,
        )
        .unwrap();

        let mut seen = Vec::new();
        walk_run_v1(&run, &mut |node| {
            if let Some((key, fqln)) = node.logical_reference() {
                seen.push(key.or(fqln).unwrap().to_string());
            }
        });
        assert_eq!(seen, vec!["A", "B", "C", "D"]);
    }
}
