//! Environment settings and their defaults.
//!
//! Bad values never abort startup: each one is recorded as a [`ConfigError`],
//! reported once logging is up, and replaced by its default.

use std::time::Duration;

use bevy::prelude::*;

use crate::data::SectionMapping;
use crate::error::ConfigError;

pub const FARM_ID_VAR: &str = "FARM_ID";
pub const ASSET_TIMEOUT_VAR: &str = "ASSET_TIMEOUT_MS";
pub const HOVER_DEBOUNCE_VAR: &str = "HOVER_DEBOUNCE_MS";
pub const SECTION_ORDER_VAR: &str = "SECTION_ORDER";

const DEFAULT_ASSET_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_HOVER_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SiteSettings {
    pub farm_id: Option<String>,
    pub asset_timeout: Duration,
    pub hover_debounce: Duration,
    pub section_order: SectionMapping,
    /// Settings that were present but unusable.
    pub rejected: Vec<ConfigError>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            farm_id: None,
            asset_timeout: DEFAULT_ASSET_TIMEOUT,
            hover_debounce: DEFAULT_HOVER_DEBOUNCE,
            section_order: SectionMapping::default(),
            rejected: Vec::new(),
        }
    }
}

/// Reads [`SiteSettings`] from the process environment.
pub fn site_settings() -> SiteSettings {
    let mut settings = SiteSettings {
        farm_id: std::env::var(FARM_ID_VAR)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|id| !id.is_empty()),
        ..SiteSettings::default()
    };

    match millis_var(ASSET_TIMEOUT_VAR) {
        Ok(Some(timeout)) if timeout.is_zero() => settings.rejected.push(invalid(
            ASSET_TIMEOUT_VAR,
            "0",
            "timeout must be positive",
        )),
        Ok(Some(timeout)) => settings.asset_timeout = timeout,
        Ok(None) => {}
        Err(err) => settings.rejected.push(err),
    }

    match millis_var(HOVER_DEBOUNCE_VAR) {
        Ok(Some(debounce)) => settings.hover_debounce = debounce,
        Ok(None) => {}
        Err(err) => settings.rejected.push(err),
    }

    if let Ok(raw) = std::env::var(SECTION_ORDER_VAR) {
        match SectionMapping::from_name(&raw) {
            Some(mapping) => settings.section_order = mapping,
            None => settings.rejected.push(invalid(
                SECTION_ORDER_VAR,
                &raw,
                "expected top-down or bottom-up",
            )),
        }
    }

    settings
}

fn millis_var(key: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|err| invalid(key, &raw, &err.to_string()))
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub(crate) fn report_settings(settings: Res<SiteSettings>) {
    for err in &settings.rejected {
        warn!("ignoring setting: {err}");
    }
    match &settings.farm_id {
        Some(id) => info!("farm {id:?}, sections {:?}", settings.section_order),
        None => info!("default sections, {:?}", settings.section_order),
    }
}
