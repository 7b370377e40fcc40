use crate::data::DatasetSource;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::{info, warn, Level};

const DEFAULT_DATASET: &str =
    "https://raw.githubusercontent.com/codeforgermany/click_that_hood/main/public/data/spain-provinces.geojson";

/// Runtime settings, read once from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub dataset: DatasetSource,
    pub entities_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: Level,
    /// Keys that fell back to their default, with the reason. Reported once
    /// logging is up, since the log destination is itself configured here.
    fallbacks: Vec<(&'static str, String)>,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut fallbacks = Vec::new();
        let mut read = |key: &'static str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| {
                fallbacks.push((key, format!("not set, using default: {default}")));
                default.to_string()
            })
        };

        let dataset = DatasetSource::parse(&read("PROVINCE_MAP_DATASET", DEFAULT_DATASET));
        let entities_path = PathBuf::from(read("PROVINCE_MAP_ENTITIES", "data/profiles.json"));
        let log_path = PathBuf::from(read("PROVINCE_MAP_LOG", "province-map.log"));
        let log_level = read("PROVINCE_MAP_LOG_LEVEL", "info");
        let log_level = parse_or(&log_level, Level::INFO, "PROVINCE_MAP_LOG_LEVEL", &mut fallbacks);

        Self {
            dataset,
            entities_path,
            log_path,
            log_level,
            fallbacks,
        }
    }

    /// Log the effective configuration and every fallback taken
    pub fn report(&self) {
        for (key, reason) in &self.fallbacks {
            if reason.starts_with("invalid") {
                warn!("{key} {reason}");
            } else {
                info!("{key} {reason}");
            }
        }
        info!(dataset = %self.dataset, entities = %self.entities_path.display(), "configuration loaded");
    }
}

fn parse_or<T: FromStr>(
    raw: &str,
    default: T,
    key: &'static str,
    fallbacks: &mut Vec<(&'static str, String)>,
) -> T
where
    T::Err: Display,
{
    raw.parse().unwrap_or_else(|e| {
        fallbacks.push((key, format!("invalid value {raw:?} ({e}), using default")));
        default
    })
}
