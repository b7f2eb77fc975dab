//! Domain types shared by every cartscout crate: the decoded [`Intent`],
//! normalized [`Product`] listings, per-platform results, the intent
//! decoder, the deadline resolver, and environment configuration.

pub mod app_config;
pub mod config;
pub mod deadline;
pub mod decode;
pub mod intent;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use deadline::{reference_now, reference_offset, resolve_deadline};
pub use decode::{decode_intent, DecodeError};
pub use intent::{Intent, ParamValue, Params, StageName};
pub use products::{
    AggregateResult, Platform, PlatformResult, Product, RETURN_POLICY_THREE_DAYS,
    RETURN_POLICY_TWO_DAYS,
};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid day name \"{0}\": expected a weekday such as \"Friday\"")]
    InvalidDay(String),

    #[error("unknown platform \"{0}\": expected \"all\", \"amazon\" or \"walmart\"")]
    UnknownPlatform(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
