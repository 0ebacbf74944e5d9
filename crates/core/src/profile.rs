//! Device-profile parsing: what the selected oven can actually do.

use serde::Serialize;
use serde_json::Value;

use crate::commands::{TemperatureRange, TemperatureUnit};
use crate::payload::{pick, pick_i64, pick_str, unwrap_profile};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OvenCapabilities {
    /// Writable cook modes, in profile order.
    pub cook_modes: Vec<String>,
    /// Cavity names the profile declares (OVEN, UPPER, LOWER, ...).
    pub locations: Vec<String>,
    pub fahrenheit: Option<TemperatureRange>,
    pub celsius: Option<TemperatureRange>,
}

impl OvenCapabilities {
    pub fn from_profile(payload: &Value) -> Self {
        let profile = unwrap_profile(payload);
        let mut caps = OvenCapabilities::default();
        for section in property_sections(profile) {
            if let Some(name) = section_location(section) {
                if !caps.locations.iter().any(|l| l.eq_ignore_ascii_case(&name)) {
                    caps.locations.push(name);
                }
            }
            if caps.cook_modes.is_empty() {
                caps.cook_modes = cook_modes(section);
            }
            if caps.fahrenheit.is_none() {
                caps.fahrenheit = temperature_range(section, TemperatureUnit::Fahrenheit);
            }
            if caps.celsius.is_none() {
                caps.celsius = temperature_range(section, TemperatureUnit::Celsius);
            }
        }
        caps
    }

    pub fn range(&self, unit: TemperatureUnit) -> Option<TemperatureRange> {
        match unit {
            TemperatureUnit::Fahrenheit => self.fahrenheit,
            TemperatureUnit::Celsius => self.celsius,
        }
    }

    /// UI hint like `170-550F`.
    pub fn temp_hint(&self, unit: TemperatureUnit) -> Option<String> {
        self.range(unit)
            .map(|r| format!("{}-{}{}", r.min, r.max, unit))
    }
}

/// A profile is a `property` array of per-cavity sections on newer models,
/// or one flat object on older ones.
fn property_sections(profile: &Value) -> Vec<&Value> {
    match profile.get("property") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(section @ Value::Object(_)) => vec![section],
        _ => vec![profile],
    }
}

fn section_location(section: &Value) -> Option<String> {
    if let Some(block) = section.get("location") {
        if let Some(name) = pick_str(block, &["locationName", "location_name"]) {
            return Some(name);
        }
    }
    pick_str(section, &["locationName", "location_name"])
}

fn cook_modes(section: &Value) -> Vec<String> {
    let prop = section
        .get("cook")
        .and_then(|c| pick(c, &["cookMode", "cook_mode"]))
        .or_else(|| pick(section, &["cookMode", "cook_mode"]));
    let Some(prop) = prop else {
        return Vec::new();
    };
    // Writable list preferred, readable as fallback, bare array accepted.
    let list = writable_value(prop)
        .and_then(Value::as_array)
        .or_else(|| readable_value(prop).and_then(Value::as_array))
        .or_else(|| prop.as_array());
    list.map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn temperature_range(section: &Value, unit: TemperatureUnit) -> Option<TemperatureRange> {
    // Newer profiles: a `temperature` array of { targetTemperature, unit }.
    if let Some(entries) = section.get("temperature").and_then(Value::as_array) {
        for entry in entries {
            let entry_unit = pick_str(entry, &["unit"]).and_then(|s| TemperatureUnit::parse(&s));
            if entry_unit == Some(unit) {
                if let Some(range) = pick(entry, &["targetTemperature", "target_temperature"])
                    .and_then(range_of)
                {
                    return Some(range);
                }
            }
        }
    }
    // Older profiles: unit-suffixed properties on the section itself.
    let keys: [&str; 2] = match unit {
        TemperatureUnit::Fahrenheit => ["targetTemperatureF", "target_temperature_f"],
        TemperatureUnit::Celsius => ["targetTemperatureC", "target_temperature_c"],
    };
    pick(section, &keys).and_then(range_of)
}

/// Extract min/max from a range property, tolerating the `value.w` wrapper.
fn range_of(prop: &Value) -> Option<TemperatureRange> {
    let candidates = [
        writable_value(prop).unwrap_or(prop),
        prop.get("value").unwrap_or(prop),
        prop,
    ];
    for candidate in candidates {
        let min = pick_i64(candidate, &["min"]);
        let max = pick_i64(candidate, &["max"]);
        if let (Some(min), Some(max)) = (min, max) {
            return Some(TemperatureRange {
                min: min as i32,
                max: max as i32,
            });
        }
    }
    None
}

fn writable_value(prop: &Value) -> Option<&Value> {
    prop.get("value")
        .and_then(|v| v.get("w"))
        .or_else(|| prop.get("w"))
}

fn readable_value(prop: &Value) -> Option<&Value> {
    prop.get("value")
        .and_then(|v| v.get("r"))
        .or_else(|| prop.get("r"))
}
