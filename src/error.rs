#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] IOError),

    #[error(transparent)]
    EnvVar(#[from] EnvVarError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({endpoint})")]
pub struct DecodeError {
    endpoint: String,
    #[source]
    source: serde_json::Error,
}

impl DecodeError {
    pub fn new(endpoint: &str, source: serde_json::Error) -> Self {
        Self {
            endpoint: endpoint.into(),
            source,
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({})", file.display())]
pub struct IOError {
    file: std::path::PathBuf,
    #[source]
    source: std::io::Error,
}

impl IOError {
    pub fn new(file: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Self {
            file: file.into(),
            source,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EnvVarSource {
    #[error(transparent)]
    Var(#[from] std::env::VarError),
    #[error(transparent)]
    Int(#[from] std::num::ParseIntError),
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({var})")]
pub struct EnvVarError {
    var: String,
    #[source]
    source: EnvVarSource,
}

impl EnvVarError {
    pub fn new(var: &str, source: impl Into<EnvVarSource>) -> Self {
        Self {
            var: var.into(),
            source: source.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({})", file.display())]
pub struct ConfigError {
    file: std::path::PathBuf,
    #[source]
    source: toml::de::Error,
}

impl ConfigError {
    pub fn new(file: impl Into<std::path::PathBuf>, source: toml::de::Error) -> Self {
        Self {
            file: file.into(),
            source,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages_name_their_origin() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = DecodeError::new("http://localhost/events", json_err).into();
        assert!(err.to_string().starts_with("JSON decode error: "));
        assert!(err.to_string().ends_with("(http://localhost/events)"));

        let parse_err = "x".parse::<u64>().unwrap_err();
        let err: Error = EnvVarError::new("CAGECARD_TIMEOUT_SECS", parse_err).into();
        assert!(err.to_string().ends_with("(CAGECARD_TIMEOUT_SECS)"));
    }
}
