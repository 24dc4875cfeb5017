use anyhow::Result;
use serde::Serialize;

/// Pretty-print any serializable value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Error object for --json consumers: a stable machine-readable kind next
/// to the human message and the underlying detail.
pub fn error_value(kind: &str, message: &str, detail: &str) -> serde_json::Value {
    serde_json::json!({
        "error": message,
        "kind": kind,
        "detail": detail,
    })
}
