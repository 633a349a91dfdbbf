use crate::core::loader::BASKET_SESSION_KEY;
use crate::core::registry::BasketRegistry;
use crate::core::rehydrate::EntityNames;
use crate::domain::model::{Address, Customer, DeliveryMethod, PaymentMethod, Product};
use crate::utils::error::{BasketError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_session_key, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub basket: BasketConfig,
    #[serde(default)]
    pub entities: EntityNames,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketConfig {
    #[serde(default = "default_basket_class")]
    pub class: String,
    #[serde(default = "default_session_key")]
    pub session_key: String,
}

fn default_basket_class() -> String {
    BasketRegistry::DEFAULT_CLASS.to_string()
}

fn default_session_key() -> String {
    BASKET_SESSION_KEY.to_string()
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            class: default_basket_class(),
            session_key: default_session_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: String,
}

fn default_session_path() -> String {
    "./var/sessions".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Fixtures for the in-memory collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub delivery_methods: Vec<DeliveryMethod>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub code: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl LoaderConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BasketError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BasketError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SESSION_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BasketError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("basket.class", &self.basket.class)?;
        validate_session_key(&self.basket.session_key)?;
        validate_non_empty_string("entities.address", &self.entities.address)?;
        validate_non_empty_string("entities.customer", &self.entities.customer)?;
        validate_path("session.path", &self.session.path)?;
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;

        for repository in &self.catalog.repositories {
            validate_non_empty_string("catalog.repositories.code", &repository.code)?;
        }

        Ok(())
    }
}

impl Validate for LoaderConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
