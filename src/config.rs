//! Configuration of the client.

use std::{fmt, io};
use std::time::Duration;

use log::LevelFilter;
use url::Url;

use crate::auth::Credentials;
use crate::constants::{
    DEFAULT_ASYNC_INTERVAL_SECS, DEFAULT_ASYNC_RETRIES,
    HTTP_CLIENT_TIMEOUT_SECS,
};


//------------ Config --------------------------------------------------------

/// Everything an [`ApiClient`][crate::ApiClient] needs to know.
#[derive(Clone, Debug)]
pub struct Config {
    /// The API entry point, e.g. `http://host:8080/client/api`.
    pub endpoint: Url,

    pub credentials: Credentials,

    /// Wait for async jobs before returning.
    pub async_block: bool,

    /// The maximum number of job status queries. Negative means unbounded.
    pub retry_limit: i64,

    pub poll_interval: Duration,

    /// The timeout of each single HTTP request.
    pub timeout: Duration,

    pub log_level: LevelFilter,
}

impl Config {
    /// Creates a config with default settings for everything but the
    /// endpoint and credentials.
    pub fn new(endpoint: Url, credentials: Credentials) -> Self {
        Config {
            endpoint,
            credentials,
            async_block: true,
            retry_limit: DEFAULT_ASYNC_RETRIES,
            poll_interval: Duration::from_secs(DEFAULT_ASYNC_INTERVAL_SECS),
            timeout: Duration::from_secs(HTTP_CLIENT_TIMEOUT_SECS),
            log_level: LevelFilter::Warn,
        }
    }

    /// Sets up logging to stderr.
    ///
    /// Can only be called once per process.
    pub fn init_logging(&self) -> Result<(), ConfigError> {
        self.fern_logger()
            .chain(io::stderr())
            .apply()
            .map_err(|e| {
                ConfigError::other(format!(
                    "Failed to init stderr logging: {}", e
                ))
            })
    }

    /// Creates the stderr dispatcher.
    ///
    /// The HTTP stack only gets to log warnings and errors. At debug and
    /// trace level each line also shows its target.
    fn fern_logger(&self) -> fern::Dispatch {
        let http_level = self.log_level.min(LevelFilter::Warn);
        let show_target = self.log_level >= LevelFilter::Debug;

        let mut dispatch = fern::Dispatch::new()
            .format(move |out, message, record| {
                let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                if show_target {
                    out.finish(format_args!(
                        "{} [{}] [{}] {}",
                        now, record.level(), record.target(), message
                    ))
                } else {
                    out.finish(format_args!(
                        "{} [{}] {}", now, record.level(), message
                    ))
                }
            })
            .level(self.log_level);
        for target in HTTP_LOG_TARGETS {
            dispatch = dispatch.level_for(*target, http_level);
        }
        dispatch
    }
}

/// The crates below reqwest that log on their own.
const HTTP_LOG_TARGETS: &[&str] =
    &["reqwest", "hyper", "hyper_util", "h2", "cookie_store"];


//------------ ConfigError ---------------------------------------------------

#[derive(Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// An argument required by the chosen authentication is missing.
    MissingArg(&'static str, &'static str),

    /// A command parameter is not of the form `key=value`.
    InvalidParameter(String),

    Other(String),
}

impl ConfigError {
    pub fn missing_arg(arg: &'static str, env: &'static str) -> Self {
        ConfigError::MissingArg(arg, env)
    }

    pub fn other(msg: impl fmt::Display) -> Self {
        ConfigError::Other(msg.to_string())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingArg(arg, env) => write!(
                f,
                "Missing argument: --{}, alternatively you may use env var: {}",
                arg, env
            ),
            ConfigError::InvalidParameter(param) => write!(
                f,
                "Invalid parameter '{}', expected key=value",
                param
            ),
            ConfigError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}


//------------ Tests ---------------------------------------------------------
