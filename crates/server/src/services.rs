use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use ovendash_core::device::{self, DeviceSummary};
use ovendash_core::profile::OvenCapabilities;
use ovendash_core::status;
use ovendash_core::{control, Command, CommandPolicy, TemperatureUnit, ValidationError};
use ovendash_thinq::{ThinqClient, ThinqError};

use crate::models::OvenSnapshot;

/// The two failure kinds of the dispatch layer: rejected locally before any
/// network call, or failed upstream with the vendor's message attached.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Upstream(#[from] ThinqError),
}

#[derive(Clone)]
pub struct OvenService {
    client: ThinqClient,
    policy: CommandPolicy,
}

impl OvenService {
    pub fn new(client: ThinqClient, policy: CommandPolicy) -> Self {
        Self { client, policy }
    }

    pub async fn devices(&self) -> Result<Vec<DeviceSummary>, ThinqError> {
        let payload = self.client.device_list().await?;
        Ok(device::summaries(&payload))
    }

    /// Assemble the dashboard view for the requested (or first) device:
    /// list, profile, status, normalized. A missing or non-oven device
    /// yields an empty snapshot rather than an error.
    pub async fn snapshot(
        &self,
        device_id: Option<&str>,
        location: Option<&str>,
    ) -> Result<OvenSnapshot, ThinqError> {
        let devices = self.devices().await?;
        let Some(selected) = device::pick_device(&devices, device_id).cloned() else {
            return Ok(OvenSnapshot::empty(devices, None));
        };
        if !selected.is_oven() {
            debug!(device_id = %selected.device_id, "selected device is not an oven");
            return Ok(OvenSnapshot::empty(devices, Some(selected)));
        }

        let profile = self.client.device_profile(&selected.device_id).await?;
        let caps = OvenCapabilities::from_profile(&profile);
        let raw_status = self.client.device_status(&selected.device_id).await?;

        let picked_location = resolve_location(&caps.locations, location);
        let display = status::normalize_at(&raw_status, picked_location.as_deref());
        let unit = display.unit.unwrap_or(TemperatureUnit::Fahrenheit);

        Ok(OvenSnapshot {
            cook_modes: caps.cook_modes.clone(),
            locations: caps.locations.clone(),
            selected_location: picked_location,
            unit: unit.as_str().to_string(),
            temp_hint: caps.temp_hint(unit),
            status: display,
            selected: Some(selected),
            devices,
            raw_status: Some(raw_status),
        })
    }

    /// Command Dispatcher. Allow-list and range checks run before any
    /// network call; on success the vendor's response is returned verbatim.
    pub async fn dispatch(
        &self,
        device_id: &str,
        location: Option<&str>,
        command: Command,
    ) -> Result<Value, DispatchError> {
        self.policy.validate(&command)?;
        let body = control::control_body(&command, location);
        let result = self.client.control(device_id, &body).await?;
        Ok(result)
    }

    /// Set cook mode and target temperature in one vendor call. With
    /// `refresh`, current status is fetched first and the command is refused
    /// locally while remote control is off for the cavity.
    pub async fn preheat(
        &self,
        device_id: &str,
        mode: &str,
        temperature: i32,
        unit: TemperatureUnit,
        location: Option<&str>,
        refresh: bool,
    ) -> Result<Value, DispatchError> {
        self.policy.validate(&Command::SetMode(mode.to_string()))?;
        self.policy.validate(&Command::SetTemperature {
            value: temperature,
            unit,
        })?;

        if refresh {
            let raw = self.client.device_status(device_id).await?;
            let display = status::normalize_at(&raw, location);
            if display.remote_enabled == Some(false) {
                let cavity = location.unwrap_or(control::DEFAULT_LOCATION).to_string();
                return Err(ValidationError::RemoteDisabled(cavity).into());
            }
        }

        let body = control::preheat_body(mode, temperature, unit, location);
        let result = self.client.control(device_id, &body).await?;
        Ok(result)
    }
}

/// Match the requested cavity against the profile, falling back through the
/// common names and finally the first cavity the profile declares.
pub fn resolve_location(known: &[String], requested: Option<&str>) -> Option<String> {
    if let Some(wanted) = requested {
        if let Some(found) = known.iter().find(|l| l.eq_ignore_ascii_case(wanted)) {
            return Some(found.clone());
        }
    }
    for fallback in ["OVEN", "UPPER", "LOWER"] {
        if let Some(found) = known.iter().find(|l| l.eq_ignore_ascii_case(fallback)) {
            return Some(found.clone());
        }
    }
    known.first().cloned().or_else(|| requested.map(String::from))
}

// ----- .env persistence (dashboard settings form) -----

pub fn env_file_path() -> PathBuf {
    std::env::var("OVENDASH_ENV_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".env"))
}

/// Rewrite the .env file and update the process environment so the new
/// credentials take effect without a restart.
pub fn save_env_config(access_token: &str, client_id: &str, country: &str) -> std::io::Result<()> {
    let access_token = access_token.trim();
    let client_id = client_id.trim();
    let country = match country.trim() {
        "" => "US",
        c => c,
    };
    let contents = format!(
        "LG_THINQ_ACCESS_TOKEN={access_token}\nLG_THINQ_CLIENT_ID={client_id}\nLG_THINQ_COUNTRY={country}\n"
    );
    std::fs::write(env_file_path(), contents)?;
    std::env::set_var("LG_THINQ_ACCESS_TOKEN", access_token);
    std::env::set_var("LG_THINQ_CLIENT_ID", client_id);
    std::env::set_var("LG_THINQ_COUNTRY", country);
    Ok(())
}
