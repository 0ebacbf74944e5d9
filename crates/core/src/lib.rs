pub mod commands;
pub mod control;
pub mod device;
pub mod payload;
pub mod profile;
pub mod status;

pub use commands::{Command, CommandPolicy, TemperatureRange, TemperatureUnit, ValidationError};
pub use device::DeviceSummary;
pub use profile::OvenCapabilities;
pub use status::OvenDisplay;
