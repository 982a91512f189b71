use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use petfriends_core::{Credentials, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

/// Settings for the client and the test suite.
///
/// Loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. `petfriends.yaml` (if it exists)
/// 3. Environment variables with the `PETFRIENDS_` prefix
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Service root. Unset means the public PetFriends service for the client,
    /// and a local service double for the test suite.
    pub base_url: Option<String>,

    /// Account the suite authenticates with.
    pub valid_email: String,

    pub valid_password: String,

    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            valid_email: String::new(),
            valid_password: String::new(),
            log_level: "info".to_string(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("valid_email", &self.valid_email)
            .field("valid_password", &"<redacted>")
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Settings {
    /// Load settings from all sources.
    ///
    /// # Errors
    /// Returns an error if a source cannot be read or the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("petfriends.yaml")
    }

    /// Load settings with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if a source cannot be read or the result is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let settings: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("PETFRIENDS_"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    /// Returns an error if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "base_url must start with http:// or https://, got '{url}'"
                )));
            }
        }

        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Validation("log_level cannot be empty".into()));
        }

        Ok(())
    }

    /// The configured service root, falling back to the public service.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.valid_email, &self.valid_password)
    }

    /// The explicitly configured service, if it comes with usable credentials.
    pub fn live_target(&self) -> Option<&str> {
        if self.valid_email.is_empty() || self.valid_password.is_empty() {
            return None;
        }
        self.base_url.as_deref()
    }
}
