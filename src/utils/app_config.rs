use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use config::{Environment, Source};
use lazy_static::lazy_static;

use super::error::Result;

static DEFAULT_CONFIG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/default_config.toml"));

/// A new type to impl `config::Source`
#[derive(Debug, Clone, serde::Deserialize)]
struct Preset(HashMap<String, config::Value>);

impl config::Source for Preset {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> std::result::Result<HashMap<String, config::Value>, config::ConfigError> {
        let mut kv = self.0.clone();
        // make sure it's not getting endlessly recursive
        kv.remove("presets");
        Ok(kv)
    }
}

/// The main structure holding application config
pub struct AppConfig(config::Config);

impl AppConfig {
    fn new() -> Self {
        // Start with empty
        Self(config::Config::new())
    }

    pub fn setup(&mut self) -> Result<&mut Self> {
        // Merge with default config
        self.0
            .merge(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))?;

        // Merge settings with env variables, e.g. SCHEDSIM_SCHEDULER__QUANTUM
        self.0
            .merge(Environment::with_prefix("SCHEDSIM").separator("__"))?;

        Ok(self)
    }

    /// Load config from a file, the format is guessed from the extension
    pub fn use_file(&mut self, path: &Path) -> Result<&mut Self> {
        self.0.merge(config::File::from(path))?;
        Ok(self)
    }

    /// Load preset
    pub fn use_preset(&mut self, name: &str) -> Result<&mut Self> {
        let preset: Preset = self.get(format!("presets.{}", name))?;
        self.0.merge(preset)?;
        Ok(self)
    }

    /// Get a single value and deserialize to the given type
    pub fn get<T, K>(&self, key: K) -> Result<T>
    where
        // use DeserializeOwned, because we are reading CONFIG using RWLock
        // and the lock is released before returning. So T should not borrow
        // anything from CONFIG.
        T: serde::de::DeserializeOwned,
        K: AsRef<str>,
    {
        Ok(self.0.get(key.as_ref())?)
    }

    /// Deserialize the whole config tree to the given type
    pub fn fetch<T>(&self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let t = self.0.clone().try_into()?;
        Ok(t)
    }
}

lazy_static! {
    /// global AppConfig instance
    static ref CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::new());
}

pub fn setup() -> Result<()> {
    config_mut().setup()?;
    Ok(())
}

/// global AppConfig instance
pub fn config() -> RwLockReadGuard<'static, AppConfig> {
    // a poisoned lock still holds a fully merged config
    CONFIG.read().unwrap_or_else(|e| e.into_inner())
}

/// mutable global AppConfig instance
pub fn config_mut() -> RwLockWriteGuard<'static, AppConfig> {
    CONFIG.write().unwrap_or_else(|e| e.into_inner())
}

pub mod prelude {
    pub use super::{config, config_mut};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::new();
        config.setup().unwrap();
        config
            .use_file(Path::new(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources/test_config.toml"
            )))
            .unwrap();

        config
    }

    #[test]
    fn fetch_config() {
        let config = test_config();

        #[derive(Deserialize)]
        struct Workload {
            bursts: Vec<u64>,
        }
        #[derive(Deserialize)]
        struct Output {
            dir: String,
            format: String,
        }
        #[derive(Deserialize)]
        struct Fragment {
            output: Output,
            workload: Workload,
        }

        let frag: Fragment = config.fetch().unwrap();

        assert_eq!(frag.output.dir, "target/test-output");
        // not in the file, kept from the defaults
        assert_eq!(frag.output.format, "text");
        assert_eq!(frag.workload.bursts, vec![2, 4, 6]);
    }

    #[test]
    fn verify_get() {
        let config = test_config();

        let algorithm: String = config.get("scheduler.type").unwrap();
        let quantum: u64 = config.get("scheduler.quantum").unwrap();

        assert_eq!(algorithm, "RR");
        assert_eq!(quantum, 2);
    }

    #[test]
    fn preset() {
        let mut config = test_config();

        let algorithm: String = config.get("scheduler.type").unwrap();
        assert_eq!(algorithm, "RR");

        config.use_preset("fcfs").unwrap();
        let algorithm: String = config.get("scheduler.type").unwrap();
        assert_eq!(algorithm, "FCFS");

        // untouched by the preset
        let bursts: Vec<u64> = config.get("workload.bursts").unwrap();
        assert_eq!(bursts, vec![2, 4, 6]);
    }
}
