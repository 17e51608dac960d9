//! CONTRACT: every successful load emits exactly one audit event with the
//! pack header; failures emit none.

use std::io;
use std::sync::{Arc, Mutex};

use ledgerpack::infrastructure::{FsPinStore, FsSetCatalog, AUDIT_TARGET};
use ledgerpack::{ActiveConfigOptions, ActiveConfigService};
use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

use crate::common::*;

#[derive(Clone, Default)]
struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    fn lines(&self) -> Vec<Value> {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn audit_events(writer: &CaptureWriter) -> Vec<Value> {
    writer
        .lines()
        .into_iter()
        .filter(|line| line["target"] == AUDIT_TARGET)
        .collect()
}

#[test]
fn contract_default_sink_logs_one_audit_event_per_load() {
    let fixture = SetsFixture::standard();
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .json()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let service = ActiveConfigService::new(
        FsSetCatalog::new(),
        FsPinStore::new(),
        ActiveConfigOptions::new(fixture.sets_root()),
    );
    let pack = service
        .get_active_config("ACME", date("2024-05-01"), None)
        .unwrap();
    let _ = service.get_active_config("NOBODY", date("2024-05-01"), Some(fixture.set_dir("acme").as_path()));

    let events = audit_events(&writer);
    assert_eq!(events.len(), 1, "{events:#?}");
    let event = &events[0];
    assert_eq!(event["level"], "INFO");
    let fields = &event["fields"];
    assert_eq!(fields["message"], "active configuration loaded");
    assert_eq!(fields["config_id"], "acme-budget");
    assert_eq!(fields["config_version"], 3);
    assert_eq!(fields["checksum"], pack.checksum().as_str());
    assert_eq!(fields["legal_entity"], "ACME");
    assert_eq!(fields["jurisdiction"], "US");
    assert_eq!(fields["regulatory_regime"], "*");
    assert_eq!(fields["policy_count"], 4);
    assert_eq!(fields["role_binding_count"], 4);
    assert_eq!(fields["effective_from"], "2024-01-01");
    assert!(fields.get("effective_to").map_or(true, Value::is_null));
}

#[test]
fn contract_cli_json_mode_writes_audit_ndjson_to_stderr() {
    let fixture = SetsFixture::standard();
    let result = fixture.run(&["active", "ACME", "--as-of", "2024-05-01", "--json"]);
    assert!(result.success, "{}", result.combined_output());

    let audits: Vec<Value> = result
        .stderr
        .lines()
        .filter_map(|l| serde_json::from_str::<Value>(l).ok())
        .filter(|v| v["event"] == "audit")
        .collect();
    assert_eq!(audits.len(), 1, "{}", result.stderr);
    assert_eq!(audits[0]["record"], result.events()[0]["record"]);
    assert_eq!(audits[0]["record"]["effective_from"], "2024-01-01");
    assert!(audits[0]["record"]["effective_to"].is_null());
}
