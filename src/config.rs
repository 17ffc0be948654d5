use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, EnvVarError, Error, IOError};

pub const DEFAULT_ENDPOINT: &str = "https://mmafightcardsapi.adaptable.app/";
pub const DEFAULT_CONFIG_FILE: &str = "cagecard.toml";

const ENDPOINT_VAR: &str = "CAGECARD_ENDPOINT";
const TIMEOUT_VAR: &str = "CAGECARD_TIMEOUT_SECS";
const LOG_VAR: &str = "CAGECARD_LOG";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    /// `None` means requests may hang forever on an unresponsive endpoint.
    pub timeout: Option<Duration>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout: None,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

impl Settings {
    /// Defaults, then the config file (if it exists), then env vars.
    pub fn load(file: &Path) -> Result<Self, Error> {
        let mut settings = Self::default();
        settings.apply_file(file)?;
        settings.apply_env()?;
        Ok(settings)
    }

    fn apply_file(&mut self, file: &Path) -> Result<(), Error> {
        let raw = match fs::read_to_string(file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(IOError::new(file, e).into()),
        };
        let parsed: FileSettings =
            toml::from_str(&raw).map_err(|e| ConfigError::new(file, e))?;

        if let Some(endpoint) = parsed.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(secs) = parsed.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(filter) = parsed.log_filter {
            self.log_filter = filter;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), Error> {
        if let Some(endpoint) = read_var(ENDPOINT_VAR)? {
            self.endpoint = endpoint;
        }
        if let Some(raw) = read_var(TIMEOUT_VAR)? {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| EnvVarError::new(TIMEOUT_VAR, e))?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(filter) = read_var(LOG_VAR)? {
            self.log_filter = filter;
        }
        Ok(())
    }
}

// env vars are process-wide, tests touching them take this lock
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

fn read_var(var: &str) -> Result<Option<String>, EnvVarError> {
    match env::var(var) {
        Ok(v) => Ok(Some(v)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(EnvVarError::new(var, e)),
    }
}
