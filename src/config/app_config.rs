use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::ModelKind;

/// Conventional deployment variables mapped onto configuration keys.
/// Applied after the `APP__` environment source so they take precedence.
const LEGACY_ENV_OVERRIDES: [(&str, &str); 7] = [
    ("S3_BUCKET_NAME", "storage.bucket"),
    ("AWS_DEFAULT_REGION", "storage.region"),
    ("AWS_ACCESS_KEY_ID", "storage.access_key_id"),
    ("AWS_SECRET_ACCESS_KEY", "storage.secret_access_key"),
    ("API_ENDPOINT", "trigger.endpoint"),
    ("MODEL_TYPE", "trigger.model_type"),
    ("ENABLE_RETRAIN_TRIGGER", "trigger.enabled"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub model: ModelConfig,
    pub trigger: TriggerConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the static prediction form served at `/ui`
    pub ui_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Local,
    Memory,
}

/// Object store settings. The bucket is process-wide; keys are per request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible stores
    pub endpoint_url: Option<String>,
    /// Root directory of the `local` backend
    pub local_dir: PathBuf,
    /// Key that uploads overwrite and retraining reads
    pub data_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub dir: PathBuf,
    pub default_kind: ModelKind,
    /// Train on the reference dataset when no artifact can be loaded at startup
    pub train_on_missing: bool,
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub enabled: bool,
    /// Base URL of the serving API, e.g. `http://localhost:8000`
    pub endpoint: Option<String>,
    pub model_type: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            ui_dir: PathBuf::from("public"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: None,
            region: None,
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
            local_dir: PathBuf::from("data/bucket"),
            data_key: "iris_data.csv".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            default_kind: ModelKind::RandomForest,
            train_on_missing: true,
            seed: 42,
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            model_type: ModelKind::RandomForest.as_str().to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ModelConfig {
    /// `<dir>/<kind>_model.bin`
    pub fn artifact_path(&self, kind: ModelKind) -> PathBuf {
        self.dir.join(kind.artifact_file_name())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(Self::app_environment(), |name| std::env::var(name).ok())
    }

    fn app_environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with(
        environment: config::Environment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment);

        for (variable, key) in LEGACY_ENV_OVERRIDES {
            if let Some(value) = lookup(variable).filter(|v| !v.trim().is_empty()) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }
}
