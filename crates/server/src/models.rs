use serde::{Deserialize, Serialize};
use serde_json::Value;

use ovendash_core::{DeviceSummary, OvenDisplay};

#[derive(Debug, Serialize)]
pub struct DevicesResponse {
    pub devices: Vec<DeviceSummary>,
}

/// Everything the dashboard needs for one render of the selected oven.
#[derive(Debug, Serialize)]
pub struct OvenSnapshot {
    pub devices: Vec<DeviceSummary>,
    pub selected: Option<DeviceSummary>,
    pub cook_modes: Vec<String>,
    pub locations: Vec<String>,
    pub selected_location: Option<String>,
    pub unit: String,
    pub status: OvenDisplay,
    pub temp_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_status: Option<Value>,
}

impl OvenSnapshot {
    /// Shape returned when no usable device exists; never an error.
    pub fn empty(devices: Vec<DeviceSummary>, selected: Option<DeviceSummary>) -> Self {
        Self {
            devices,
            selected,
            cook_modes: Vec::new(),
            locations: Vec::new(),
            selected_location: None,
            unit: "F".to_string(),
            status: OvenDisplay::default(),
            temp_hint: None,
            raw_status: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreheatRequest {
    pub cook_mode: String,
    pub temperature: i32,
    /// "F" or "C"; defaults to Fahrenheit.
    pub unit: Option<String>,
    pub location: Option<String>,
    /// Fetch current status first and refuse while remote control is off.
    pub refresh: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SaveConfigRequest {
    pub access_token: String,
    pub client_id: String,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigStatusResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_client_id: Option<String>,
}
