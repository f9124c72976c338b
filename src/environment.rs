// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub upload_path: PathBuf,
    pub database_path: PathBuf,
    pub parser_service_url: String,
    pub chatbot_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let mut config = Self::load_from_file(&environment)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("CVTECH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(environment: &str) -> Result<Self> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!("config.yaml not found in current directory. Server cannot start without configuration.");
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;

        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            upload_path: Self::resolve_path(&env_config.upload_path)?,
            database_path: Self::resolve_path(&env_config.database_path)?,
            parser_service_url: env_config.parser_service_url,
            chatbot_url: env_config.chatbot_url,
            request_timeout_secs: env_config.request_timeout_secs,
        })
    }

    /// External service URLs can be overridden without editing config.yaml
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PARSER_SERVICE_URL") {
            self.parser_service_url = url;
        }
        if let Ok(url) = std::env::var("CHATBOT_URL") {
            self.chatbot_url = url;
        }
    }

    fn resolve_path(path: &PathBuf) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.clone())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the upload directory and the database parent directory exist
    pub async fn ensure_directories(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to create upload directory: {}",
                    self.upload_path.display()
                )
            })?;

        if let Some(db_parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(db_parent)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create database directory: {}",
                        db_parent.display()
                    )
                })?;
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}
