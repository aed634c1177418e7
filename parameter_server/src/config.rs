use std::{
    env,
    error::Error,
    fmt::{self, Display},
};

use comms::Endpoint;

use crate::{optimization::Accumulate, storage::ParameterStore};

const ENDPOINT_VAR: &str = "PS_ENDPOINT";
const MAX_EPOCHS_VAR: &str = "PS_MAX_EPOCHS";
const STEP_VAR: &str = "PS_REGULARIZATION_STEP";

/// Error returned when an environment variable holds an invalid value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErr {
    var: &'static str,
    reason: String,
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {}", self.var, self.reason)
    }
}

impl Error for ConfigErr {}

/// Immutable settings of a parameter server instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub endpoint: Endpoint,
    pub max_epochs: u64,
    pub regularization_step: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            max_epochs: ParameterStore::<Accumulate>::DEFAULT_MAX_EPOCHS,
            regularization_step: Accumulate::DEFAULT_STEP,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> Result<Self, ConfigErr> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to it's value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            cfg.endpoint = endpoint.parse().map_err(|e| ConfigErr {
                var: ENDPOINT_VAR,
                reason: format!("{e}"),
            })?;
        }

        if let Some(max_epochs) = lookup(MAX_EPOCHS_VAR) {
            cfg.max_epochs = max_epochs.trim().parse().map_err(|e| ConfigErr {
                var: MAX_EPOCHS_VAR,
                reason: format!("{max_epochs:?} {e}"),
            })?;
        }

        if let Some(step) = lookup(STEP_VAR) {
            let parsed: f32 = step.trim().parse().map_err(|e| ConfigErr {
                var: STEP_VAR,
                reason: format!("{step:?} {e}"),
            })?;

            if !parsed.is_finite() {
                return Err(ConfigErr {
                    var: STEP_VAR,
                    reason: format!("{step:?} is not a finite number"),
                });
            }

            cfg.regularization_step = parsed;
        }

        Ok(cfg)
    }

    /// Builds the parameter store described by this configuration.
    pub fn store(&self) -> ParameterStore<Accumulate> {
        ParameterStore::new(Accumulate::new(self.regularization_step), self.max_epochs)
    }
}
