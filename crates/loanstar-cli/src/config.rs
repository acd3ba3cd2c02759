//! Configuration layering: defaults, then an optional TOML file, then flags.

use std::path::{Path, PathBuf};

use loanstar_model::{ConfigError, PipelineConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Where and how the tables are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    /// One DuckDB database holding every table.
    Duckdb,
}

/// Database file name used when `[output] database` is not set.
pub const DEFAULT_DATABASE: &str = "loanstar.duckdb";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Target directory; defaults to `output/` next to the input file.
    pub dir: Option<PathBuf>,
    pub format: OutputFormat,
    /// Database file for the `duckdb` format; defaults to `loanstar.duckdb` in `dir`.
    pub database: Option<PathBuf>,
}

/// Contents of a `--config` file: the pipeline sections plus `[output]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
    pub output: OutputSettings,
}

impl ConfigFile {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigLoadError> {
        toml::from_str(text).map_err(|source| ConfigLoadError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

/// Values given on the command line. `None`/empty leaves the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub no_header: bool,
    pub max_missing_percent: Option<f64>,
    pub max_missing_count: Option<usize>,
    pub dimensions: Vec<String>,
    pub fact_columns: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub database: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, mut config: ConfigFile) -> ConfigFile {
        let pipeline = &mut config.pipeline;
        if let Some(input) = self.input {
            pipeline.input.path = input;
        }
        if let Some(delimiter) = self.delimiter {
            pipeline.input.delimiter = delimiter;
        }
        if self.no_header {
            pipeline.input.has_headers = false;
        }
        if let Some(percent) = self.max_missing_percent {
            pipeline.quality.max_missing_percent = percent;
        }
        if let Some(count) = self.max_missing_count {
            pipeline.quality.max_missing_count = count;
        }
        if !self.dimensions.is_empty() {
            pipeline.star.dimensions = self.dimensions;
        }
        if !self.fact_columns.is_empty() {
            pipeline.star.fact_columns = self.fact_columns;
        }
        if let Some(dir) = self.output_dir {
            config.output.dir = Some(dir);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(database) = self.database {
            config.output.database = Some(database);
        }
        config
    }
}

/// Resolve the effective configuration and validate it.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<ConfigFile, ConfigLoadError> {
    let base = match config_path {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let config = overrides.apply(base);
    config.pipeline.validate()?;
    Ok(config)
}

/// The directory the sinks write to.
pub fn output_dir(config: &ConfigFile) -> PathBuf {
    config.output.dir.clone().unwrap_or_else(|| {
        config
            .pipeline
            .input
            .path
            .parent()
            .map_or_else(|| PathBuf::from("output"), |parent| parent.join("output"))
    })
}

/// The database file the `duckdb` format writes to.
pub fn database_path(config: &ConfigFile) -> PathBuf {
    config
        .output
        .database
        .clone()
        .unwrap_or_else(|| output_dir(config).join(DEFAULT_DATABASE))
}
