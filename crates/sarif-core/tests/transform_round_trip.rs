use sarif_core::model::v1::SarifLogV1;
use sarif_core::transform::{parse_document, transform_text, SarifDocument};
use sarif_core::SarifVersion;

const V1_LOG: &str = r#"{"$schema":"http://json.schemastore.org/sarif-1.0.0","version":"1.0.0","runs":[{"tool":{"name":"CodeScanner","semanticVersion":"2.1.0"},"invocation":{"commandLine":"scan src","startTime":"2016-07-16T14:18:25.000Z"},"files":{"file:///src/list.cpp":{"mimeType":"text/x-c"}},"results":[{"ruleId":"C2001","level":"warning","message":"Variable is declared but never used.","locations":[{"resultFile":{"uri":"file:///src/list.cpp","region":{"startLine":15,"startColumn":9}}}]}],"rules":{"C2001":{"id":"C2001","shortDescription":"Unused variable."}},"properties":{"owner":"build"}}]}"#;

const V2_LOG: &str = r#"{"$schema":"https://json.schemastore.org/sarif-2.1.0.json","version":"2.1.0","runs":[{"tool":{"driver":{"name":"CodeScanner","semanticVersion":"2.1.0","rules":[{"id":"C2001","shortDescription":{"text":"Unused variable."},"defaultConfiguration":{"level":"warning"}}]}},"invocations":[{"commandLine":"scan src","executionSuccessful":true}],"artifacts":[{"location":{"uri":"file:///src/list.cpp"},"mimeType":"text/x-c","encoding":"utf-8"}],"results":[{"ruleId":"C2001","ruleIndex":0,"level":"error","message":{"text":"Variable is declared but never used."},"locations":[{"physicalLocation":{"artifactLocation":{"uri":"file:///src/list.cpp","index":0},"region":{"startLine":15,"startColumn":9}}}]}],"columnKind":"utf16CodeUnits","properties":{"owner":"build"}}]}"#;

fn canonical(text: &str) -> String {
    parse_document(text).unwrap().to_json(false).unwrap()
}

#[test]
fn test_fixtures_are_canonical() {
    assert_eq!(canonical(V1_LOG), V1_LOG);
    assert_eq!(canonical(V2_LOG), V2_LOG);
}

#[test]
fn test_v1_round_trip_is_byte_exact() {
    let v2 = transform_text(V1_LOG, SarifVersion::Current, false).unwrap();
    assert!(v2.contains(r#""sarifv1/run""#));

    let back = transform_text(&v2, SarifVersion::OneZeroZero, false).unwrap();
    assert_eq!(back, V1_LOG);
}

#[test]
fn test_v2_round_trip_is_byte_exact() {
    let v1 = transform_text(V2_LOG, SarifVersion::OneZeroZero, false).unwrap();
    assert!(v1.contains(r#""sarifv2/run""#));
    assert!(v1.contains(r#""version":"1.0.0""#));

    let back = transform_text(&v1, SarifVersion::Current, false).unwrap();
    assert_eq!(back, V2_LOG);
}

#[test]
fn test_stash_is_stripped_across_three_hops() {
    let hop1 = transform_text(V1_LOG, SarifVersion::Current, false).unwrap();
    let hop2 = transform_text(&hop1, SarifVersion::OneZeroZero, false).unwrap();
    let hop3 = transform_text(&hop2, SarifVersion::Current, false).unwrap();

    assert!(!hop2.contains("sarifv2/run"));
    assert!(!hop2.contains("sarifv1/run"));
    assert_eq!(hop3, hop1);
    assert_eq!(hop3.matches("sarifv1/run").count(), 1);
}

#[test]
fn test_stash_is_stripped_across_three_hops_from_v2() {
    let hop1 = transform_text(V2_LOG, SarifVersion::OneZeroZero, false).unwrap();
    let hop2 = transform_text(&hop1, SarifVersion::Current, false).unwrap();
    let hop3 = transform_text(&hop2, SarifVersion::OneZeroZero, false).unwrap();

    assert_eq!(hop2, V2_LOG);
    assert_eq!(hop3, hop1);
    assert_eq!(hop3.matches("sarifv2/run").count(), 1);
    assert!(!hop3.contains("sarifv1/run"));
}

#[test]
fn test_converted_run_keeps_user_properties() {
    let v2 = transform_text(V1_LOG, SarifVersion::Current, false).unwrap();
    let SarifDocument::V2(log) = parse_document(&v2).unwrap() else {
        panic!("expected a 2.1.0 document");
    };
    let bag = log.runs[0].properties.as_ref().unwrap();
    assert_eq!(bag.get_raw("owner"), Some(r#""build""#));

    let invocation = &log.runs[0].invocations.as_ref().unwrap()[0];
    assert!(invocation.execution_successful);
    assert_eq!(
        invocation.start_time_utc.as_ref().unwrap().to_sarif_string(),
        "2016-07-16T14:18:25.000Z"
    );
}

#[test]
fn test_logical_location_key_collision() {
    let text = r#"{
        "version": "2.1.0",
        "runs": [{
            "tool": {"driver": {"name": "t"}},
            "logicalLocations": [
                {"name": "Register", "fullyQualifiedName": "Register", "kind": "function"},
                {"name": "Register", "fullyQualifiedName": "Register", "kind": "type"}
            ],
            "results": [{
                "message": {"text": "x"},
                "locations": [
                    {"logicalLocations": [{"fullyQualifiedName": "Register", "index": 0}]},
                    {"logicalLocations": [{"fullyQualifiedName": "Register", "index": 1}]}
                ],
                "stacks": [{
                    "frames": [
                        {"location": {"logicalLocations": [{"fullyQualifiedName": "Register", "index": 1}]}},
                        {"location": {"logicalLocations": [{"fullyQualifiedName": "Register", "index": 0}]}}
                    ]
                }]
            }]
        }]
    }"#;

    let v1 = transform_text(text, SarifVersion::OneZeroZero, false).unwrap();
    let log: SarifLogV1 = serde_json::from_str(&v1).unwrap();
    let run = &log.runs[0];

    let logical = run.logical_locations.as_ref().unwrap();
    assert_eq!(logical.keys().collect::<Vec<_>>(), vec!["Register", "Register-0"]);
    assert_eq!(logical["Register-0"].kind.as_deref(), Some("type"));

    let locations = run.results.as_ref().unwrap()[0].locations.as_ref().unwrap();
    assert_eq!(locations[0].fully_qualified_logical_name.as_deref(), Some("Register"));
    assert_eq!(locations[0].logical_location_key, None);
    assert_eq!(locations[1].fully_qualified_logical_name.as_deref(), Some("Register"));
    assert_eq!(locations[1].logical_location_key.as_deref(), Some("Register-0"));

    let frames = &run.results.as_ref().unwrap()[0].stacks.as_ref().unwrap()[0].frames;
    assert_eq!(frames[0].fully_qualified_logical_name.as_deref(), Some("Register"));
    assert_eq!(frames[0].logical_location_key.as_deref(), Some("Register-0"));
    assert_eq!(frames[1].fully_qualified_logical_name.as_deref(), Some("Register"));
    assert_eq!(frames[1].logical_location_key, None);
}

#[test]
fn test_utf16_char_offset_too_large_to_double_is_kept() {
    let text = r#"{
        "version": "2.1.0",
        "runs": [{
            "tool": {"driver": {"name": "t"}},
            "artifacts": [{"location": {"uri": "file:///src/a.cs"}, "encoding": "utf-16"}],
            "results": [{
                "message": {"text": "x"},
                "locations": [{"physicalLocation": {
                    "artifactLocation": {"index": 0},
                    "region": {"charOffset": 9223372036854775807}
                }}]
            }]
        }]
    }"#;

    let v1 = transform_text(text, SarifVersion::OneZeroZero, false).unwrap();
    assert!(
        v1.contains(r#""region":{"offset":9223372036854775807}"#),
        "{}",
        v1
    );
}

#[test]
fn test_utf16_char_offset_becomes_byte_offset() {
    let text = r#"{
        "version": "2.1.0",
        "runs": [{
            "tool": {"driver": {"name": "t"}},
            "artifacts": [{"location": {"uri": "file:///src/a.cs"}, "encoding": "utf-16"}],
            "results": [{
                "message": {"text": "x"},
                "locations": [{"physicalLocation": {
                    "artifactLocation": {"index": 0},
                    "region": {"charOffset": 8}
                }}]
            }]
        }]
    }"#;

    let v1 = transform_text(text, SarifVersion::OneZeroZero, false).unwrap();
    assert!(v1.contains(r#""region":{"offset":16}"#), "{}", v1);
}

#[test]
fn test_unknown_enum_survives_round_trip_without_stash() {
    let text = r#"{"version":"2.1.0","runs":[{"tool":{"driver":{"name":"t"}},"results":[{"level":"fatal","message":{"text":"x"}}]}]}"#;
    let v1 = transform_text(text, SarifVersion::OneZeroZero, false).unwrap();

    // Drop the run stash so the reverse transform has to convert.
    let mut log: SarifLogV1 = serde_json::from_str(&v1).unwrap();
    log.runs[0].properties = None;
    let stripped = serde_json::to_string(&log).unwrap();

    let back = transform_text(&stripped, SarifVersion::Current, false).unwrap();
    let SarifDocument::V2(log) = parse_document(&back).unwrap() else {
        panic!("expected a 2.1.0 document");
    };
    let result = &log.runs[0].results.as_ref().unwrap()[0];
    assert_eq!(result.level.as_ref().map(|l| l.as_str()), Some("fatal"));
    assert!(result.properties.is_none());
}
