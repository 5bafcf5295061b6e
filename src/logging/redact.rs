use crate::types::plan::ApplyMode;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Return a timestamp for facts emission based on mode.
/// - DryRun: constant zero timestamp for determinism.
/// - Commit: real, current timestamp in RFC3339.
pub fn ts_for_mode(mode: ApplyMode) -> String {
    match mode {
        ApplyMode::DryRun => TS_ZERO.to_string(),
        ApplyMode::Commit => now_iso(),
    }
}

/// Zero timestamps and drop volatile fields so facts compare across runs.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        obj.remove("run_id");
        obj.remove("provider_id");
    }
    v
}
