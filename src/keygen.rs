//! Synthetic key and timestamp generation.

use chrono::{Local, SecondsFormat, Utc};
use rand::Rng;
use serde_json::Value;

/// How a resource's key is produced on create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyScheme {
    /// 1 + the last record's key, or 1 when the collection is empty.
    SequentialInt,
    /// Four independently drawn uppercase letters followed by the current
    /// Unix epoch milliseconds. Collisions are unlikely, not impossible.
    LetterPrefixMillis,
    /// Random UUID v4, for callers that want a guaranteed-unique key instead
    /// of the letter-prefix shape.
    Uuid,
}

/// Hour-component distribution for the generated visit duration. The two
/// variants are not equivalent; which one applies depends on the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationStrategy {
    /// Uniform draw r in [0,100): r <= 88 gives "00", r <= 96 gives "01",
    /// anything above gives "02".
    Weighted,
    /// Hour uniform over {"00", "01"}.
    UniformShort,
}

/// Next integer key: 1 + the last record's key field, or 1 on empty.
pub fn next_int_key(records: &[Value], key_field: &str) -> i64 {
    records
        .last()
        .and_then(|r| r.get(key_field))
        .and_then(Value::as_i64)
        .map(|k| k + 1)
        .unwrap_or(1)
}

/// Letter-prefix visit id: 4 uppercase letters plus epoch milliseconds.
pub fn visit_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id = String::with_capacity(17);
    for _ in 0..4 {
        id.push((b'A' + rng.gen_range(0..26u8)) as char);
    }
    id.push_str(&Utc::now().timestamp_millis().to_string());
    id
}

pub fn uuid_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current date as `YYYY-MM-DD`.
pub fn date_stamp() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current local time as zero-padded `HH:MM`.
pub fn time_stamp() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Order creation timestamp, ISO-8601 with millisecond precision.
pub fn created_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Synthetic `HH:MM:SS` visit duration. Hour per `strategy`; minute uniform
/// in [0,25); second uniform in [0,61).
pub fn duration_stamp(strategy: DurationStrategy) -> String {
    let mut rng = rand::thread_rng();
    let hour = match strategy {
        DurationStrategy::Weighted => {
            let r = rng.gen_range(0..100);
            if r <= 88 {
                "00"
            } else if r <= 96 {
                "01"
            } else {
                "02"
            }
        }
        DurationStrategy::UniformShort => {
            if rng.gen_range(0..2) == 0 {
                "00"
            } else {
                "01"
            }
        }
    };
    format!(
        "{}:{:02}:{:02}",
        hour,
        rng.gen_range(0..25),
        rng.gen_range(0..61)
    )
}
