use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/analysis";
const ENV_PREFIX: &str = "SST";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisSettings {
    /// Velocity magnitude (mm/s) separating low- and high-speed bands
    #[serde(default = "default_high_speed_threshold")]
    pub high_speed_threshold: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            high_speed_threshold: default_high_speed_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            extension: default_extension(),
        }
    }
}

fn default_high_speed_threshold() -> f64 {
    200.0
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_extension() -> String {
    "json".to_string()
}

/// Load the optional config file at `path`, overlaid by `SST_`-prefixed environment variables
pub fn load_app_config(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    tracing::debug!("Loaded configuration: {:?}", app_config);
    Ok(app_config)
}
