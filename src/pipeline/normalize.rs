use chrono::Utc;
use serde_json::{Number, Value};

use crate::domain::Finding;

/// Picks the object the finding fields live in. Real deliveries nest the
/// finding under `detail`; test-harness deliveries often put it at the
/// top level.
pub fn select_detail(event: &Value) -> &Value {
    match event.get("detail") {
        Some(detail) if is_truthy(detail) => detail,
        _ => event,
    }
}

/// Extracts a canonical finding from a delivered event. Total over any
/// JSON input: absent or mistyped fields degrade to defaults rather than
/// erroring, so upstream schema drift never fails an invocation.
pub fn normalize(event: &Value) -> Finding {
    let detail = select_detail(event);

    let id = id_field(detail, "id")
        .or_else(|| id_field(detail, "findingId"))
        .unwrap_or_else(fallback_id);

    Finding {
        id,
        title: detail
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("No title")
            .to_string(),
        severity: number_field(detail, "severity").unwrap_or_else(|| Number::from(0)),
        description: detail
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
    }
}

/// Wall-clock fallback id. Retried deliveries of an unidentified finding
/// each get a fresh id and will not dedup against each other; this is
/// documented behavior, not a bug.
pub fn fallback_id() -> String {
    Utc::now().timestamp_micros().to_string()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

// Empty strings and numeric zero count as absent, so they fall through
// to the next candidate in the id resolution chain.
fn id_field(detail: &Value, key: &str) -> Option<String> {
    match detail.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64().map_or(false, |f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(detail: &Value, key: &str) -> Option<Number> {
    match detail.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_detail_is_preferred() {
        let event = json!({
            "id": "outer",
            "detail": {"id": "inner", "title": "T", "severity": 3}
        });
        let finding = normalize(&event);
        assert_eq!(finding.id, "inner");
        assert_eq!(finding.title, "T");
        assert_eq!(finding.severity, Number::from(3));
    }

    #[test]
    fn test_top_level_fields_used_without_detail() {
        let event = json!({"id": "top", "severity": 7});
        let finding = normalize(&event);
        assert_eq!(finding.id, "top");
        assert_eq!(finding.severity, Number::from(7));
    }

    #[test]
    fn test_empty_detail_falls_back_to_top_level() {
        let event = json!({"id": "top", "detail": {}});
        assert_eq!(normalize(&event).id, "top");

        let event = json!({"id": "top", "detail": null});
        assert_eq!(normalize(&event).id, "top");
    }

    #[test]
    fn test_finding_id_field_is_second_choice() {
        let event = json!({"detail": {"findingId": "fid-1"}});
        assert_eq!(normalize(&event).id, "fid-1");

        // An empty `id` does not shadow `findingId`
        let event = json!({"detail": {"id": "", "findingId": "fid-2"}});
        assert_eq!(normalize(&event).id, "fid-2");
    }

    #[test]
    fn test_numeric_ids_are_rendered_but_zero_counts_as_absent() {
        let event = json!({"detail": {"id": 42}});
        assert_eq!(normalize(&event).id, "42");

        let event = json!({"detail": {"id": 0, "findingId": "fid-3"}});
        assert_eq!(normalize(&event).id, "fid-3");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let finding = normalize(&json!({"detail": {"id": "f1"}}));
        assert_eq!(finding.title, "No title");
        assert_eq!(finding.severity, Number::from(0));
        assert_eq!(finding.description, "");
    }

    #[test]
    fn test_missing_id_generates_time_based_fallback() {
        let finding = normalize(&json!({"detail": {"title": "unidentified"}}));
        assert!(!finding.id.is_empty());
        assert!(finding.id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_normalize_is_total_over_non_objects() {
        let finding = normalize(&json!("not an object"));
        assert_eq!(finding.title, "No title");
        assert_eq!(finding.severity, Number::from(0));
    }
}
