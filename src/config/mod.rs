use crate::models::UserConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat, Map};
use std::fs;

/// Prefix of environment variables that override settings (`QUIZDECK_API_BASE`, ...).
pub const ENV_PREFIX: &str = "QUIZDECK";

/// Default configuration directory, relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "QuizDeck Data";

const USER_CONFIG_FILE: &str = "QuizDeck Settings.yaml";

/// Configuration manager for loading and saving the YAML user settings.
///
/// Settings are layered: built-in defaults, then `QuizDeck Settings.yaml`, then
/// `QUIZDECK_*` environment variables. Saving writes only the YAML file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    user_config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created when it does not exist yet.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            user_config_path: config_dir.join(USER_CONFIG_FILE),
            config_dir,
        })
    }

    /// Load the user configuration, applying `QUIZDECK_*` environment overrides.
    ///
    /// A missing settings file yields the defaults.
    pub fn load_user_config(&self) -> Result<UserConfig> {
        self.load_layered(None)
    }

    /// Load the user configuration with an explicit set of environment variables
    /// instead of the process environment.
    pub fn load_user_config_with_env(&self, vars: Map<String, String>) -> Result<UserConfig> {
        self.load_layered(Some(vars))
    }

    fn load_layered(&self, env: Option<Map<String, String>>) -> Result<UserConfig> {
        if self.user_config_path.exists() {
            tracing::info!("Loading user config from {}", self.user_config_path);
        } else {
            tracing::warn!(
                "User config file not found at {}, using defaults",
                self.user_config_path
            );
        }

        let settings = Config::builder()
            .add_source(
                File::from(self.user_config_path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("Failed to read user config: {}", self.user_config_path))?;

        let config: UserConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse user config: {}", self.user_config_path))?;

        tracing::debug!(?config, "Resolved user config");
        Ok(config)
    }

    /// Save the user configuration file.
    pub fn save_user_config(&self, config: &UserConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize user config to YAML")?;

        fs::write(&self.user_config_path, yaml_string)
            .with_context(|| format!("Failed to write user config: {}", self.user_config_path))?;

        tracing::info!("Saved user config to {}", self.user_config_path);
        Ok(())
    }

    /// Load, modify and save the user configuration in one step.
    ///
    /// Environment overrides are not written back: the file is re-read without them.
    pub fn update_user_config<F>(&self, updater: F) -> Result<UserConfig>
    where
        F: FnOnce(&mut UserConfig),
    {
        let mut config = self.load_layered(Some(Map::new()))?;
        updater(&mut config);
        self.save_user_config(&config)?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn user_config_path(&self) -> &Utf8Path {
        &self.user_config_path
    }
}
