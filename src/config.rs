use serde::{Deserialize, Serialize};

use crate::models::LatLng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDefaults {
    /// View applied to a map declared without `center`/`zoom`.
    pub default_center: LatLng,
    pub default_zoom: f64,
    pub enable_logging: bool,
    pub log_level: String,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(48.8566, 2.3522), // Paris
            default_zoom: 12.0,
            enable_logging: true,
            log_level: "info".to_string(),
        }
    }
}

impl MapDefaults {
    /// Loads settings from compile-time environment (see build.rs for `.env`).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match key {
            "MAP_DEFAULT_CENTER_LAT" => option_env!("MAP_DEFAULT_CENTER_LAT"),
            "MAP_DEFAULT_CENTER_LNG" => option_env!("MAP_DEFAULT_CENTER_LNG"),
            "MAP_DEFAULT_ZOOM" => option_env!("MAP_DEFAULT_ZOOM"),
            "ENABLE_LOGGING" => option_env!("ENABLE_LOGGING"),
            "LOG_LEVEL" => option_env!("LOG_LEVEL"),
            _ => None,
        })
    }

    /// Builds settings from any key lookup. Unset or unparseable keys keep
    /// their default.
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, fallback: f64| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .unwrap_or(fallback)
        };

        Self {
            default_center: LatLng::new(
                number("MAP_DEFAULT_CENTER_LAT", defaults.default_center.lat),
                number("MAP_DEFAULT_CENTER_LNG", defaults.default_center.lng),
            ),
            default_zoom: number("MAP_DEFAULT_ZOOM", defaults.default_zoom),
            enable_logging: lookup("ENABLE_LOGGING")
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(defaults.enable_logging),
            log_level: lookup("LOG_LEVEL")
                .map(|raw| raw.trim().to_lowercase())
                .filter(|level| log_level(level).is_some())
                .unwrap_or(defaults.log_level),
        }
    }

    pub fn level(&self) -> log::Level {
        log_level(&self.log_level).unwrap_or(log::Level::Info)
    }
}

fn log_level(name: &str) -> Option<log::Level> {
    match name {
        "error" => Some(log::Level::Error),
        "warn" => Some(log::Level::Warn),
        "info" => Some(log::Level::Info),
        "debug" => Some(log::Level::Debug),
        "trace" => Some(log::Level::Trace),
        _ => None,
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: MapDefaults = MapDefaults::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_keys_keep_defaults() {
        assert_eq!(MapDefaults::from_lookup(|_| None), MapDefaults::default());
    }

    #[test]
    fn reads_and_validates_values() {
        let config = MapDefaults::from_lookup(|key| match key {
            "MAP_DEFAULT_CENTER_LAT" => Some("59.3367"),
            "MAP_DEFAULT_CENTER_LNG" => Some("not a number"),
            "MAP_DEFAULT_ZOOM" => Some(" 9 "),
            "ENABLE_LOGGING" => Some("false"),
            "LOG_LEVEL" => Some("DEBUG"),
            _ => None,
        });

        assert_eq!(config.default_center, LatLng::new(59.3367, 2.3522));
        assert_eq!(config.default_zoom, 9.0);
        assert!(!config.enable_logging);
        assert_eq!(config.level(), log::Level::Debug);
    }

    #[test]
    fn unknown_log_level_falls_back() {
        let config = MapDefaults::from_lookup(|key| (key == "LOG_LEVEL").then_some("loud"));
        assert_eq!(config.log_level, "info");
    }
}
