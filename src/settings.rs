use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

/// Tunables for one engine run, read from an optional `simventory.toml`
/// next to the working directory and from `SIMVENTORY_`-prefixed
/// environment variables. The store file itself is the positional CLI
/// argument, not a setting.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Segments accumulated in memory before one transactional commit.
    pub batch_size: usize,
    /// Whether to create the input and inventory indexes. Leave on unless
    /// the log is already indexed from a previous run.
    pub build_indexes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { batch_size: 100_000, build_indexes: true }
    }
}

impl Settings {
    pub fn load() -> Result<Settings> {
        let defaults = Settings::default();
        let cfg = Config::builder()
            .set_default("batch_size", defaults.batch_size as i64)?
            .set_default("build_indexes", defaults.build_indexes)?
            .add_source(File::with_name("simventory").required(false))
            .add_source(Environment::with_prefix("SIMVENTORY").try_parsing(true))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}
