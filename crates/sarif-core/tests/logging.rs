use std::sync::{Arc, Mutex};

use sarif_core::config::parse_config;
use sarif_core::transform::transform_text;
use sarif_core::SarifVersion;

struct MockWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let buffer_clone = buffer.clone();

    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || MockWriter(buffer_clone.clone()))
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let out = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    out
}

const V1_LOG: &str = r#"{"version":"1.0.0","runs":[{"tool":{"name":"t"},"results":[{"level":"error","message":"m"}]}]}"#;

#[test]
fn test_stash_and_restore_emit_structured_events() {
    let output = capture(|| {
        let v2 = transform_text(V1_LOG, SarifVersion::Current, false).unwrap();
        transform_text(&v2, SarifVersion::OneZeroZero, false).unwrap();
    });

    assert!(output.contains("\"event\":\"sarif.transform.stashed\""));
    assert!(output.contains("\"key\":\"sarifv1/run\""));
    assert!(output.contains("\"event\":\"sarif.transform.restored_from_stash\""));
    assert!(output.contains("\"event\":\"sarif.transform.document\""));
    assert!(output.contains("\"timestamp\""));
}

#[test]
fn test_unknown_config_fields_warn_in_lax_mode() {
    let output = capture(|| {
        parse_config("configVersion: 1\ncolour: blue\n", false).unwrap();
    });

    assert!(output.contains("\"event\":\"sarif.config.unknown_fields\""));
    assert!(output.contains("colour"));
    assert!(output.contains("\"level\":\"WARN\""));
}
