use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Initial set of oven commands. We can evolve this schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Command {
    Start,
    Stop,
    SetTemperature { value: i32, unit: TemperatureUnit },
    SetMode(String),
    RemoteControl(bool),
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::SetTemperature { .. } => "set_temperature",
            Command::SetMode(_) => "set_mode",
            Command::RemoteControl(_) => "remote_control",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "C")]
    Celsius,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Celsius => "C",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "F" | "FAHRENHEIT" => Some(TemperatureUnit::Fahrenheit),
            "C" | "CELSIUS" => Some(TemperatureUnit::Celsius),
            _ => None,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: i32,
    pub max: i32,
}

impl TemperatureRange {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Which commands this deployment is willing to forward, and the numeric
/// bounds for set-temperature. These are vendor- and model-specific, so they
/// are loaded from configuration rather than baked in; the defaults cover
/// common LG wall ovens and ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandPolicy {
    pub allowed: Vec<String>,
    pub fahrenheit: TemperatureRange,
    pub celsius: TemperatureRange,
    /// Writable cook modes; empty accepts any mode string.
    pub cook_modes: Vec<String>,
}

impl Default for CommandPolicy {
    fn default() -> Self {
        Self {
            allowed: ["start", "stop", "set_temperature", "set_mode", "remote_control"]
                .into_iter()
                .map(String::from)
                .collect(),
            fahrenheit: TemperatureRange { min: 170, max: 550 },
            celsius: TemperatureRange { min: 80, max: 285 },
            cook_modes: Vec::new(),
        }
    }
}

impl CommandPolicy {
    pub fn range(&self, unit: TemperatureUnit) -> TemperatureRange {
        match unit {
            TemperatureUnit::Fahrenheit => self.fahrenheit,
            TemperatureUnit::Celsius => self.celsius,
        }
    }

    /// Local check performed before any network call is made.
    pub fn validate(&self, command: &Command) -> Result<(), ValidationError> {
        if !self.allowed.iter().any(|kind| kind == command.kind()) {
            return Err(ValidationError::NotAllowed(command.kind().to_string()));
        }
        match command {
            Command::SetTemperature { value, unit } => {
                let range = self.range(*unit);
                if !range.contains(*value) {
                    return Err(ValidationError::TemperatureOutOfRange {
                        value: *value,
                        unit: *unit,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
            Command::SetMode(mode) => {
                if !self.cook_modes.is_empty()
                    && !self.cook_modes.iter().any(|m| m.eq_ignore_ascii_case(mode))
                {
                    return Err(ValidationError::UnsupportedMode(mode.clone()));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("command '{0}' is not in the allow-list")]
    NotAllowed(String),
    #[error("temperature {value}{unit} is outside {min}-{max}{unit}")]
    TemperatureOutOfRange {
        value: i32,
        unit: TemperatureUnit,
        min: i32,
        max: i32,
    },
    #[error("cook mode '{0}' is not writable on this model")]
    UnsupportedMode(String),
    #[error("remote control is off for {0}; enable it on the appliance and retry")]
    RemoteDisabled(String),
}
