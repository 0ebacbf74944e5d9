// Control-request bodies matching the ThinQ Connect device-control endpoint.

use serde_json::{json, Value};

use crate::commands::{Command, TemperatureUnit};

/// Cavity used when the caller does not name one.
pub const DEFAULT_LOCATION: &str = "OVEN";

fn location_block(location: Option<&str>) -> Value {
    json!({ "locationName": location.unwrap_or(DEFAULT_LOCATION) })
}

/// Body for a single validated command.
pub fn control_body(command: &Command, location: Option<&str>) -> Value {
    let location = location_block(location);
    match command {
        Command::Start => json!({
            "location": location,
            "ovenOperation": {"ovenOperationMode": "START"}
        }),
        Command::Stop => json!({
            "location": location,
            "ovenOperation": {"ovenOperationMode": "STOP"}
        }),
        Command::SetTemperature { value, unit } => json!({
            "location": location,
            "temperature": {"targetTemperature": value, "unit": unit.as_str()}
        }),
        Command::SetMode(mode) => json!({
            "location": location,
            "cook": {"cookMode": mode}
        }),
        Command::RemoteControl(enabled) => json!({
            "location": location,
            "operation": {"remoteControlEnabled": enabled}
        }),
    }
}

/// Body for the combined mode-plus-temperature preheat call the vendor
/// accepts as one request.
pub fn preheat_body(
    mode: &str,
    value: i32,
    unit: TemperatureUnit,
    location: Option<&str>,
) -> Value {
    json!({
        "location": location_block(location),
        "cook": {"cookMode": mode},
        "temperature": {"targetTemperature": value, "unit": unit.as_str()}
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_stop_target_the_named_cavity() {
        let body = control_body(&Command::Start, Some("UPPER"));
        assert_eq!(body["location"]["locationName"], "UPPER");
        assert_eq!(body["ovenOperation"]["ovenOperationMode"], "START");

        let body = control_body(&Command::Stop, None);
        assert_eq!(body["location"]["locationName"], DEFAULT_LOCATION);
        assert_eq!(body["ovenOperation"]["ovenOperationMode"], "STOP");
    }

    #[test]
    fn set_temperature_carries_unit() {
        let cmd = Command::SetTemperature {
            value: 175,
            unit: TemperatureUnit::Celsius,
        };
        let body = control_body(&cmd, None);
        assert_eq!(body["temperature"]["targetTemperature"], 175);
        assert_eq!(body["temperature"]["unit"], "C");
    }

    #[test]
    fn remote_control_toggles_flag() {
        let body = control_body(&Command::RemoteControl(false), None);
        assert_eq!(body["operation"]["remoteControlEnabled"], false);
    }

    #[test]
    fn preheat_combines_mode_and_temperature() {
        let body = preheat_body("BAKE", 350, TemperatureUnit::Fahrenheit, Some("LOWER"));
        assert_eq!(body["cook"]["cookMode"], "BAKE");
        assert_eq!(body["temperature"]["targetTemperature"], 350);
        assert_eq!(body["temperature"]["unit"], "F");
        assert_eq!(body["location"]["locationName"], "LOWER");
    }
}
