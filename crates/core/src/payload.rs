//! Tolerant accessors for loosely-typed vendor payloads.
//!
//! The ThinQ API mixes camelCase and snake_case field names between device
//! generations and wraps results in varying envelopes, so every lookup here
//! takes a list of candidate keys and treats a miss as `None`, never an error.

use serde_json::Value;

/// First non-null value among `keys`.
pub fn pick<'a>(entry: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = entry.as_object()?;
    for key in keys {
        match map.get(*key) {
            Some(Value::Null) | None => continue,
            Some(value) => return Some(value),
        }
    }
    None
}

pub fn pick_str(entry: &Value, keys: &[&str]) -> Option<String> {
    pick(entry, keys).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

pub fn pick_i64(entry: &Value, keys: &[&str]) -> Option<i64> {
    pick(entry, keys).and_then(|value| {
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

pub fn pick_bool(entry: &Value, keys: &[&str]) -> Option<bool> {
    pick(entry, keys).and_then(|value| match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_ascii_uppercase().as_str() {
            "TRUE" | "ON" | "ENABLE" | "ENABLED" | "LOCK" | "LOCKED" => Some(true),
            "FALSE" | "OFF" | "DISABLE" | "DISABLED" | "UNLOCK" | "UNLOCKED" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Unwrap a device-list response into its entries. Accepts a bare array or
/// any of the envelope keys the vendor has used.
pub fn unwrap_list(payload: &Value) -> Vec<Value> {
    if let Some(items) = payload.as_array() {
        return items.clone();
    }
    if payload.is_object() {
        for key in ["devices", "deviceList", "items", "result"] {
            if let Some(items) = payload.get(key).and_then(Value::as_array) {
                return items.clone();
            }
        }
    }
    Vec::new()
}

/// Unwrap a status response envelope. Only container values are treated as
/// envelopes; a scalar under `state` is a status field, not a wrapper.
pub fn unwrap_status(payload: &Value) -> &Value {
    if payload.is_object() {
        for key in ["state", "result", "data", "status"] {
            if let Some(inner) = payload.get(key) {
                if inner.is_object() || inner.is_array() {
                    return inner;
                }
            }
        }
    }
    payload
}

/// Unwrap a device-profile response envelope.
pub fn unwrap_profile(payload: &Value) -> &Value {
    if payload.is_object() {
        for key in ["profile", "result", "modelJson", "modelJsonV2", "data"] {
            if let Some(inner) = payload.get(key) {
                if inner.is_object() {
                    return inner;
                }
            }
        }
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pick_skips_null_and_missing_keys() {
        let entry = json!({"a": null, "b": 3});
        assert_eq!(pick(&entry, &["a", "b"]), Some(&json!(3)));
        assert_eq!(pick(&entry, &["a", "c"]), None);
        assert_eq!(pick(&json!("not an object"), &["a"]), None);
    }

    #[test]
    fn pick_i64_coerces_strings_and_floats() {
        let entry = json!({"s": "350", "f": 120.7});
        assert_eq!(pick_i64(&entry, &["s"]), Some(350));
        assert_eq!(pick_i64(&entry, &["f"]), Some(120));
        assert_eq!(pick_i64(&entry, &["missing"]), None);
    }

    #[test]
    fn pick_bool_accepts_vendor_spellings() {
        let entry = json!({"a": true, "b": "LOCK", "c": "OFF", "d": "whatever"});
        assert_eq!(pick_bool(&entry, &["a"]), Some(true));
        assert_eq!(pick_bool(&entry, &["b"]), Some(true));
        assert_eq!(pick_bool(&entry, &["c"]), Some(false));
        assert_eq!(pick_bool(&entry, &["d"]), None);
    }

    #[test]
    fn unwrap_list_handles_bare_and_enveloped_payloads() {
        assert_eq!(unwrap_list(&json!([1, 2])).len(), 2);
        assert_eq!(unwrap_list(&json!({"deviceList": [1]})).len(), 1);
        assert!(unwrap_list(&json!({"count": 0})).is_empty());
        assert!(unwrap_list(&json!(null)).is_empty());
    }

    #[test]
    fn unwrap_status_leaves_scalar_state_alone() {
        let enveloped = json!({"state": {"cookMode": "BAKE"}});
        assert_eq!(unwrap_status(&enveloped), &json!({"cookMode": "BAKE"}));

        let flat = json!({"state": "BAKE", "target_temp": 350});
        assert_eq!(unwrap_status(&flat), &flat);
    }

    #[test]
    fn unwrap_profile_prefers_known_envelopes() {
        let payload = json!({"result": {"property": []}});
        assert_eq!(unwrap_profile(&payload), &json!({"property": []}));
        let bare = json!({"property": []});
        assert_eq!(unwrap_profile(&bare), &bare);
    }
}
