use std::io::Write;

use log::Level;
use serde_json::Value;

pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Operator-facing sink used by the CLI.
///
/// Audit lines at `Info` and above always go to stderr; `Debug` lines and
/// facts (one JSON object per line) only when `verbose` is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrSink {
    pub verbose: bool,
}

impl StderrSink {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn max_level(&self) -> Level {
        if self.verbose {
            Level::Debug
        } else {
            Level::Info
        }
    }
}

impl AuditSink for StderrSink {
    fn log(&self, level: Level, msg: &str) {
        if level > self.max_level() {
            return;
        }
        let mut err = std::io::stderr().lock();
        let _ = match level {
            Level::Error => writeln!(err, "ERROR: {msg}"),
            Level::Warn => writeln!(err, "WARNING: {msg}"),
            Level::Info => writeln!(err, "{msg}"),
            Level::Debug | Level::Trace => writeln!(err, "  {msg}"),
        };
    }
}

impl FactsEmitter for StderrSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, fields: Value) {
        if !self.verbose {
            return;
        }
        let _ = writeln!(std::io::stderr().lock(), "{fields}");
    }
}
