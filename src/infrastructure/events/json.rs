//! JSON Event Sink
//!
//! Outputs sync events as NDJSON for schedulers and log shippers.

use crate::domain::ports::{SyncEvent, SyncEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl SyncEventSink for JsonEventSink {
    fn on_event(&self, event: SyncEvent) {
        let json = match event {
            SyncEvent::Started {
                domains,
                mechanism,
                dry_run,
            } => {
                serde_json::json!({
                    "event": "start",
                    "command": "sync",
                    "domains": domains,
                    "mechanism": mechanism,
                    "dry_run": dry_run,
                })
            }

            SyncEvent::DomainListed { domain, count } => {
                serde_json::json!({
                    "event": "domain_listed",
                    "command": "sync",
                    "domain": domain,
                    "count": count,
                })
            }

            SyncEvent::DomainFailed { domain, error } => {
                serde_json::json!({
                    "event": "domain_failed",
                    "command": "sync",
                    "domain": domain,
                    "error": error,
                })
            }

            SyncEvent::UserAdded { username, domain } => {
                serde_json::json!({
                    "event": "user_added",
                    "command": "sync",
                    "username": username,
                    "domain": domain,
                })
            }

            SyncEvent::UserEnabled { username, domain } => {
                serde_json::json!({
                    "event": "user_enabled",
                    "command": "sync",
                    "username": username,
                    "domain": domain,
                })
            }

            SyncEvent::UserDisabled { username } => {
                serde_json::json!({
                    "event": "user_disabled",
                    "command": "sync",
                    "username": username,
                })
            }

            SyncEvent::UserExcluded { username, reason } => {
                serde_json::json!({
                    "event": "user_excluded",
                    "command": "sync",
                    "username": username,
                    "reason": reason,
                })
            }

            SyncEvent::ActionPlanned { username, action } => {
                serde_json::json!({
                    "event": "action_planned",
                    "command": "sync",
                    "username": username,
                    "action": action,
                })
            }

            SyncEvent::ActionFailed {
                username,
                action,
                error,
            } => {
                serde_json::json!({
                    "event": "action_failed",
                    "command": "sync",
                    "username": username,
                    "action": action,
                    "error": error,
                })
            }

            SyncEvent::Completed {
                ok,
                added,
                added_failed,
                enabled,
                disabled,
                disabled_failed,
            } => {
                let status = if !ok {
                    "failed"
                } else if added_failed == 0 && disabled_failed == 0 {
                    "success"
                } else {
                    "partial"
                };
                serde_json::json!({
                    "event": "complete",
                    "command": "sync",
                    "status": status,
                    "added": added,
                    "added_failed": added_failed,
                    "enabled": enabled,
                    "disabled": disabled,
                    "disabled_failed": disabled_failed,
                })
            }
        };

        self.write_event(json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ActionKind, DomainName, Username};
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn output(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn json_sink_outputs_start_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(SyncEvent::Started {
            domains: vec![DomainName::from("LDAP")],
            mechanism: "sync-all".to_string(),
            dry_run: false,
        });

        let output = output(&buffer);
        assert!(output.contains("\"event\":\"start\""));
        assert!(output.contains("\"domains\":[\"LDAP\"]"));
    }

    #[test]
    fn json_sink_writes_one_line_per_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(SyncEvent::UserDisabled {
            username: Username::canonicalize("bob").unwrap(),
        });
        sink.on_event(SyncEvent::ActionFailed {
            username: Username::canonicalize("carol").unwrap(),
            action: ActionKind::Add,
            error: "store refused".to_string(),
        });

        let output = output(&buffer);
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["username"], "bob");
        assert_eq!(lines[1]["action"], "add");
    }

    #[test]
    fn json_sink_outputs_partial_on_failures() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(SyncEvent::Completed {
            ok: true,
            added: 3,
            added_failed: 1,
            enabled: 0,
            disabled: 2,
            disabled_failed: 0,
        });

        let output = output(&buffer);
        assert!(output.contains("\"status\":\"partial\""));
        assert!(output.contains("\"added\":3"));
    }

    #[test]
    fn json_sink_outputs_failed_on_fatal() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(SyncEvent::Completed {
            ok: false,
            added: 0,
            added_failed: 0,
            enabled: 0,
            disabled: 0,
            disabled_failed: 0,
        });

        assert!(output(&buffer).contains("\"status\":\"failed\""));
    }
}
