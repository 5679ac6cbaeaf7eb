use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

static FALLBACK_SEQ: AtomicU64 = AtomicU64::new(0);

pub const EPOCH_RFC3339: &str = "1970-01-01T00:00:00Z";

/// Current UTC time, millisecond precision.
pub fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    let now = now.replace_millisecond(now.millisecond()).unwrap_or(now);
    now.format(&Rfc3339)
        .unwrap_or_else(|_| EPOCH_RFC3339.to_string())
}

pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value.trim(), &Rfc3339).ok()
}

/// Picks `candidate` unless it sorts before `floor`, so a note never ends up
/// with `updated_at < created_at` when the clock steps backwards.
pub fn not_before(floor: &str, candidate: String) -> String {
    match (parse_timestamp(floor), parse_timestamp(&candidate)) {
        (Some(f), Some(c)) if c < f => floor.to_string(),
        _ => candidate,
    }
}

/// Completes a `(created_at, updated_at)` pair read from storage or the wire.
/// A missing side copies the other, both missing become `missing`, and
/// `updated_at` is clamped to `created_at`.
pub fn pair_timestamps(
    created: Option<String>,
    updated: Option<String>,
    missing: &str,
) -> (String, String) {
    match (created, updated) {
        (Some(created), Some(updated)) => {
            let updated = not_before(&created, updated);
            (created, updated)
        }
        (Some(created), None) => (created.clone(), created),
        (None, Some(updated)) => (updated.clone(), updated),
        (None, None) => (missing.to_string(), missing.to_string()),
    }
}

/// Random v4 UUID when the OS random source works, otherwise
/// `{unix_millis}-{suffix}`.
pub fn generate_id() -> String {
    let mut bytes = [0u8; 16];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string(),
        Err(err) => {
            tracing::debug!("os random source unavailable ({err}), using fallback id");
            fallback_id()
        }
    }
}

pub(crate) fn fallback_id() -> String {
    let now = OffsetDateTime::now_utc();
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let seq = FALLBACK_SEQ.fetch_add(1, Ordering::Relaxed);
    let mix = u64::from(now.nanosecond())
        ^ (u64::from(std::process::id()) << 32)
        ^ seq.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    format!("{millis}-{mix:016x}{seq:x}")
}

/// Ids may arrive as JSON strings or numbers; both compare as strings.
/// Integral floats drop their fraction, so `7.0` and `7` name the same note.
pub fn id_from_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn string_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

pub fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}
