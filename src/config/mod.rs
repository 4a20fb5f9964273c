//! Typed configuration for the access service.
//!
//! Read from `LEARNHUB__<SECTION>__<KEY>` environment variables, after a
//! `.env` file if one exists:
//!
//! | Variable | Required |
//! |----------|----------|
//! | `LEARNHUB__DATABASE__URL` | yes |
//! | `LEARNHUB__AUTH__JWT_SECRET` | yes |
//! | `LEARNHUB__AUTH__ISSUER` | yes |
//! | `LEARNHUB__SERVER__*`, `LEARNHUB__FEATURES__*` | no |

mod auth;
mod database;
mod error;
mod features;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "LEARNHUB";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks each section, then the rules that span sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;

        if self.is_production() && self.features.verbose_errors {
            return Err(ValidationError::VerboseErrorsInProduction);
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
