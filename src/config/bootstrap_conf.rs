use std::env;
use serde::{Serialize, Deserialize};
use crate::config::ConfigError;

/// Credentials of the first OAS staff account, created at startup when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapStaffConfig {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

fn required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::EnvVarNotFound(key.to_string()))
}

impl BootstrapStaffConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(BootstrapStaffConfig {
            username: required("BOOTSTRAP_STAFF_USERNAME")?,
            first_name: required("BOOTSTRAP_STAFF_FIRST_NAME")?,
            last_name: required("BOOTSTRAP_STAFF_LAST_NAME")?,
            email: required("BOOTSTRAP_STAFF_EMAIL")?,
            password: required("BOOTSTRAP_STAFF_PASSWORD")?,
        })
    }
}
