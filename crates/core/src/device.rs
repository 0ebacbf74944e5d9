//! Device-list entry normalization.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::payload::{pick_str, unwrap_list};

const ID_KEYS: [&str; 4] = ["deviceId", "device_id", "id", "deviceID"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub device_id: String,
    pub alias: String,
    pub model_name: String,
    pub device_type: String,
}

impl DeviceSummary {
    /// Build a summary from one vendor list entry. Entries without an id or
    /// type are skipped rather than treated as an error.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let entry = merge_device_info(entry);
        let device_id = pick_str(&entry, &ID_KEYS)?;
        let device_type = pick_str(&entry, &["deviceType", "device_type", "type"])?;
        let model_name = pick_str(&entry, &["modelName", "model_name"]).unwrap_or_default();
        let alias = pick_str(&entry, &["alias", "name"])
            .filter(|s| !s.is_empty())
            .or_else(|| (!model_name.is_empty()).then(|| model_name.clone()))
            .unwrap_or_else(|| device_id.clone());
        Some(Self {
            device_id,
            alias,
            model_name,
            device_type,
        })
    }

    pub fn is_oven(&self) -> bool {
        self.device_type.to_ascii_uppercase().contains("OVEN")
    }

    /// Dropdown label: alias, model, and the type with its DEVICE_ prefix cut.
    pub fn label(&self) -> String {
        let kind = self
            .device_type
            .strip_prefix("DEVICE_")
            .unwrap_or(&self.device_type);
        if self.model_name.is_empty() {
            format!("{} ({})", self.alias, kind)
        } else {
            format!("{} - {} ({})", self.alias, self.model_name, kind)
        }
    }
}

/// Some API versions nest everything under `deviceInfo` but leave the id at
/// the outer level; merge the two so lookups see one flat object.
fn merge_device_info(entry: &Value) -> Value {
    let Some(info) = entry.get("deviceInfo").and_then(Value::as_object) else {
        return entry.clone();
    };
    let mut merged: Map<String, Value> = info.clone();
    for key in ID_KEYS {
        if let Some(id) = entry.get(key) {
            merged.entry(key.to_string()).or_insert_with(|| id.clone());
        }
    }
    Value::Object(merged)
}

/// Normalize a whole device-list payload.
pub fn summaries(list_payload: &Value) -> Vec<DeviceSummary> {
    unwrap_list(list_payload)
        .iter()
        .filter_map(DeviceSummary::from_entry)
        .collect()
}

/// Pick the requested device, or the first one when the id is absent or not
/// present in the list.
pub fn pick_device<'a>(
    devices: &'a [DeviceSummary],
    device_id: Option<&str>,
) -> Option<&'a DeviceSummary> {
    if let Some(wanted) = device_id {
        if let Some(found) = devices.iter().find(|d| d.device_id == wanted) {
            return Some(found);
        }
    }
    devices.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_entry_is_normalized() {
        let entry = json!({
            "deviceId": "oven-1",
            "deviceType": "DEVICE_OVEN",
            "modelName": "LWD3063",
            "alias": "Kitchen Oven"
        });
        let summary = DeviceSummary::from_entry(&entry).unwrap();
        assert_eq!(summary.device_id, "oven-1");
        assert!(summary.is_oven());
        assert_eq!(summary.label(), "Kitchen Oven - LWD3063 (OVEN)");
    }

    #[test]
    fn nested_device_info_is_merged_with_outer_id() {
        let entry = json!({
            "deviceId": "abc",
            "deviceInfo": {"deviceType": "DEVICE_OVEN", "alias": "Oven"}
        });
        let summary = DeviceSummary::from_entry(&entry).unwrap();
        assert_eq!(summary.device_id, "abc");
        assert_eq!(summary.alias, "Oven");
    }

    #[test]
    fn entries_without_id_or_type_are_skipped() {
        assert!(DeviceSummary::from_entry(&json!({"alias": "x"})).is_none());
        assert!(DeviceSummary::from_entry(&json!({"deviceId": "y"})).is_none());
    }

    #[test]
    fn alias_falls_back_to_model_then_id() {
        let entry = json!({"deviceId": "d1", "deviceType": "DEVICE_OVEN", "modelName": "M"});
        assert_eq!(DeviceSummary::from_entry(&entry).unwrap().alias, "M");
        let bare = json!({"deviceId": "d1", "deviceType": "DEVICE_OVEN"});
        assert_eq!(DeviceSummary::from_entry(&bare).unwrap().alias, "d1");
    }

    #[test]
    fn list_payload_is_filtered_and_picked() {
        let payload = json!({"devices": [
            {"deviceId": "a", "deviceType": "DEVICE_OVEN"},
            {"noise": true},
            {"deviceId": "b", "deviceType": "DEVICE_WASHER"}
        ]});
        let devices = summaries(&payload);
        assert_eq!(devices.len(), 2);
        assert_eq!(pick_device(&devices, Some("b")).unwrap().device_id, "b");
        assert_eq!(pick_device(&devices, Some("zzz")).unwrap().device_id, "a");
        assert_eq!(pick_device(&devices, None).unwrap().device_id, "a");
        assert!(pick_device(&[], None).is_none());
    }
}
