//! Status Normalizer: raw vendor status payload -> fixed-shape display record.
//!
//! Missing fields resolve to unknown sentinels and unrecognized codes map to
//! a generic label; nothing in here can fail.

use serde::Serialize;
use serde_json::Value;

use crate::commands::TemperatureUnit;
use crate::payload::{pick, pick_bool, pick_i64, pick_str, unwrap_status};

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const UNSUPPORTED_LABEL: &str = "Unsupported";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OvenDisplay {
    /// Human-readable state; `"Unknown"` when the payload carries nothing
    /// usable, `"Unsupported"` for codes this build does not recognize.
    pub state: String,
    pub mode: Option<String>,
    pub target: Option<i64>,
    pub current: Option<i64>,
    pub unit: Option<TemperatureUnit>,
    pub remaining_minutes: Option<i64>,
    pub locked: Option<bool>,
    pub remote_enabled: Option<bool>,
    pub online: Option<bool>,
}

impl Default for OvenDisplay {
    fn default() -> Self {
        Self {
            state: UNKNOWN_LABEL.to_string(),
            mode: None,
            target: None,
            current: None,
            unit: None,
            remaining_minutes: None,
            locked: None,
            remote_enabled: None,
            online: None,
        }
    }
}

pub fn normalize(raw: &Value) -> OvenDisplay {
    normalize_at(raw, None)
}

/// Normalize the cavity named by `location` (`OVEN`, `UPPER`, `LOWER`);
/// falls back to the first cavity, then to the top-level object.
pub fn normalize_at(raw: &Value, location: Option<&str>) -> OvenDisplay {
    let status = unwrap_status(raw);
    let cavity = cavity_entry(status, location);
    // Cavity fields win; connectivity and lock flags often sit at the top level.
    let sources: Vec<&Value> = match cavity {
        Some(entry) if entry != status => vec![entry, status],
        _ => vec![status],
    };

    let mode = lookup_str(&sources, &["mode", "cookMode", "cook_mode"]);
    let state_code = lookup_str(&sources, &["currentState", "current_state", "state"]);
    let unit = lookup_str(&sources, &["temperatureUnit", "temperature_unit", "unit"])
        .and_then(|s| TemperatureUnit::parse(&s));

    OvenDisplay {
        state: state_label(state_code.as_deref(), mode.as_deref()),
        target: target_temperature(&sources, unit),
        current: lookup_i64(
            &sources,
            &["current_temp", "currentTemperature", "current_temperature"],
        ),
        remaining_minutes: remaining_minutes(&sources),
        locked: lookup_bool(&sources, &["door_locked", "doorLock", "doorLocked", "childLock"]),
        remote_enabled: lookup_bool(
            &sources,
            &["remote_enabled", "remoteControlEnabled", "remote_control_enabled"],
        ),
        online: lookup_bool(&sources, &["online", "connected", "deviceConnected"]),
        mode,
        unit,
    }
}

fn cavity_entry<'a>(status: &'a Value, location: Option<&str>) -> Option<&'a Value> {
    let entries: Vec<&Value> = match status {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => match status.get("location") {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => return Some(status),
        },
        _ => return None,
    };
    if let Some(wanted) = location {
        for entry in &entries {
            let name = pick_str(entry, &["locationName", "location_name", "location"]);
            if name.is_some_and(|n| n.eq_ignore_ascii_case(wanted)) {
                return Some(*entry);
            }
        }
    }
    entries.first().copied()
}

fn lookup<'a>(sources: &[&'a Value], keys: &[&str]) -> Option<&'a Value> {
    sources.iter().find_map(|source| pick(source, keys))
}

fn lookup_str(sources: &[&Value], keys: &[&str]) -> Option<String> {
    sources.iter().find_map(|source| pick_str(source, keys))
}

fn lookup_i64(sources: &[&Value], keys: &[&str]) -> Option<i64> {
    sources.iter().find_map(|source| pick_i64(source, keys))
}

fn lookup_bool(sources: &[&Value], keys: &[&str]) -> Option<bool> {
    sources.iter().find_map(|source| pick_bool(source, keys))
}

fn target_temperature(sources: &[&Value], unit: Option<TemperatureUnit>) -> Option<i64> {
    if let Some(v) = lookup_i64(
        sources,
        &["target_temp", "targetTemperature", "target_temperature"],
    ) {
        return Some(v);
    }
    // Unit-suffixed variants; prefer the reported unit when present.
    let (first, second) = match unit {
        Some(TemperatureUnit::Celsius) => (
            ["targetTemperatureC", "target_temperature_c"],
            ["targetTemperatureF", "target_temperature_f"],
        ),
        _ => (
            ["targetTemperatureF", "target_temperature_f"],
            ["targetTemperatureC", "target_temperature_c"],
        ),
    };
    lookup_i64(sources, &first).or_else(|| lookup_i64(sources, &second))
}

fn remaining_minutes(sources: &[&Value]) -> Option<i64> {
    let hour = lookup_i64(sources, &["remainHour", "remain_hour"]);
    let minute = lookup_i64(sources, &["remainMinute", "remain_minute"]);
    if hour.is_none() && minute.is_none() {
        // Some payloads nest the timer under its own object.
        if let Some(timer) = lookup(sources, &["timer", "remainTime", "remain_time"]) {
            let h = pick_i64(timer, &["hour", "remainHour"]);
            let m = pick_i64(timer, &["minute", "remainMinute"]);
            if h.is_none() && m.is_none() {
                return None;
            }
            return Some(h.unwrap_or(0) * 60 + m.unwrap_or(0));
        }
        return None;
    }
    Some(hour.unwrap_or(0) * 60 + minute.unwrap_or(0))
}

fn state_label(state_code: Option<&str>, mode: Option<&str>) -> String {
    if let Some(code) = state_code {
        return run_state_label(code)
            .or_else(|| mode.and_then(cook_mode_label))
            .unwrap_or(UNSUPPORTED_LABEL)
            .to_string();
    }
    match mode {
        Some(code) => cook_mode_label(code).unwrap_or(UNSUPPORTED_LABEL).to_string(),
        None => UNKNOWN_LABEL.to_string(),
    }
}

fn run_state_label(code: &str) -> Option<&'static str> {
    match code.trim().to_ascii_uppercase().as_str() {
        "INITIAL" | "IDLE" | "POWER_OFF" => Some("Idle"),
        "PREHEATING" | "PREHEAT" => Some("Preheating"),
        "COOKING_IN_PROGRESS" | "COOK" | "COOKING" => Some("Cooking"),
        "PAUSE" | "PAUSED" => Some("Paused"),
        "DONE" | "COMPLETE" | "COOKING_COMPLETE" => Some("Done"),
        "CLEANING" | "CLEANING_IN_PROGRESS" => Some("Cleaning"),
        "ERROR" => Some("Error"),
        _ => None,
    }
}

fn cook_mode_label(code: &str) -> Option<&'static str> {
    match code.trim().to_ascii_uppercase().as_str() {
        "BAKE" => Some("Baking"),
        "ROAST" => Some("Roasting"),
        "BROIL" => Some("Broiling"),
        "CONVECTION_BAKE" => Some("Convection Bake"),
        "CONVECTION_ROAST" => Some("Convection Roast"),
        "AIR_FRY" => Some("Air Fry"),
        "GRILL" => Some("Grilling"),
        "STEAM" => Some("Steaming"),
        "WARM" | "KEEP_WARM" => Some("Keeping Warm"),
        "PROOF" => Some("Proofing"),
        "DEHYDRATE" => Some("Dehydrating"),
        "SELF_CLEAN" | "CLEAN" => Some("Self Clean"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bake_payload_maps_to_display_record() {
        let raw = json!({
            "mode": "BAKE",
            "target_temp": 350,
            "current_temp": 120,
            "door_locked": true
        });
        let display = normalize(&raw);
        assert_eq!(display.state, "Baking");
        assert_eq!(display.target, Some(350));
        assert_eq!(display.current, Some(120));
        assert_eq!(display.locked, Some(true));
        assert_eq!(display.remaining_minutes, None);
    }

    #[test]
    fn empty_payload_yields_unknown_sentinels() {
        let display = normalize(&json!({}));
        assert_eq!(display, OvenDisplay::default());
        assert_eq!(display.state, UNKNOWN_LABEL);
        assert_eq!(display.target, None);
        assert_eq!(display.locked, None);
    }

    #[test]
    fn non_object_payload_does_not_panic() {
        assert_eq!(normalize(&json!(null)), OvenDisplay::default());
        assert_eq!(normalize(&json!("garbage")), OvenDisplay::default());
        assert_eq!(normalize(&json!([])), OvenDisplay::default());
    }

    #[test]
    fn unrecognized_mode_code_maps_to_unsupported() {
        let display = normalize(&json!({"mode": "HYPERBAKE_9000"}));
        assert_eq!(display.state, UNSUPPORTED_LABEL);
        assert_eq!(display.mode.as_deref(), Some("HYPERBAKE_9000"));
    }

    #[test]
    fn run_state_takes_precedence_over_cook_mode() {
        let raw = json!({"currentState": "PREHEATING", "cookMode": "BAKE"});
        let display = normalize(&raw);
        assert_eq!(display.state, "Preheating");
        assert_eq!(display.mode.as_deref(), Some("BAKE"));
    }

    #[test]
    fn enveloped_camel_case_payload_is_accepted() {
        let raw = json!({
            "state": {
                "cookMode": "CONVECTION_BAKE",
                "targetTemperatureF": 425,
                "temperatureUnit": "F",
                "remainHour": 1,
                "remainMinute": 20,
                "remoteControlEnabled": true
            }
        });
        let display = normalize(&raw);
        assert_eq!(display.state, "Convection Bake");
        assert_eq!(display.target, Some(425));
        assert_eq!(display.unit, Some(TemperatureUnit::Fahrenheit));
        assert_eq!(display.remaining_minutes, Some(80));
        assert_eq!(display.remote_enabled, Some(true));
    }

    #[test]
    fn celsius_unit_prefers_celsius_target() {
        let raw = json!({
            "temperatureUnit": "C",
            "targetTemperatureF": 350,
            "targetTemperatureC": 175
        });
        let display = normalize(&raw);
        assert_eq!(display.unit, Some(TemperatureUnit::Celsius));
        assert_eq!(display.target, Some(175));
    }

    #[test]
    fn location_array_resolves_requested_cavity() {
        let raw = json!({
            "location": [
                {"locationName": "UPPER", "cookMode": "BAKE", "targetTemperatureF": 350},
                {"locationName": "LOWER", "cookMode": "BROIL", "targetTemperatureF": 500}
            ],
            "doorLock": "LOCK"
        });
        let lower = normalize_at(&raw, Some("lower"));
        assert_eq!(lower.state, "Broiling");
        assert_eq!(lower.target, Some(500));
        // Top-level lock flag still visible from the cavity view.
        assert_eq!(lower.locked, Some(true));

        // Unknown location falls back to the first cavity.
        let fallback = normalize_at(&raw, Some("MIDDLE"));
        assert_eq!(fallback.state, "Baking");
    }
}
