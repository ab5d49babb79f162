//! The command line options of `cmonkey`.

use std::time::Duration;

use log::LevelFilter;
use url::Url;

use crate::api::ParameterMap;
use crate::auth::Credentials;
use crate::config::{Config, ConfigError};
use crate::constants::{
    CLOUDSTACK_ENV_API_KEY, CLOUDSTACK_ENV_ASYNC_INTERVAL,
    CLOUDSTACK_ENV_ASYNC_RETRIES, CLOUDSTACK_ENV_AUTH_TYPE,
    CLOUDSTACK_ENV_ENTRY_POINT, CLOUDSTACK_ENV_PASSWORD,
    CLOUDSTACK_ENV_SECRET_KEY, CLOUDSTACK_ENV_TIMEOUT,
    CLOUDSTACK_ENV_USERNAME, CMONKEY_ENV_LOG_LEVEL, DEFAULT_ASYNC_INTERVAL_SECS,
    DEFAULT_ASYNC_RETRIES, DEFAULT_ENTRY_POINT, HTTP_CLIENT_TIMEOUT_SECS,
};
use super::report::ReportOptions;


//------------ Options -------------------------------------------------------

/// The command line options for the CloudStack client.
#[derive(clap::Parser)]
#[command(
    version,
    about = "Simple client script for Apache CloudStack",
)]
pub struct Options {
    /// The CloudStack API entry point.
    #[arg(
        short, long,
        env = CLOUDSTACK_ENV_ENTRY_POINT,
        default_value = DEFAULT_ENTRY_POINT
    )]
    pub entry_point: Url,

    /// How to authenticate.
    #[arg(
        short = 't', long,
        env = CLOUDSTACK_ENV_AUTH_TYPE,
        value_enum,
        default_value_t = AuthType::Signature,
    )]
    pub auth_type: AuthType,

    /// The API key, as found in the management web UI.
    #[arg(short, long, env = CLOUDSTACK_ENV_API_KEY)]
    pub api_key: Option<String>,

    /// The secret key, as found in the management web UI.
    #[arg(short, long, env = CLOUDSTACK_ENV_SECRET_KEY)]
    pub secret_key: Option<String>,

    /// The user name for cookie authentication.
    #[arg(short, long, env = CLOUDSTACK_ENV_USERNAME)]
    pub username: Option<String>,

    /// The password for cookie authentication.
    #[arg(short, long, env = CLOUDSTACK_ENV_PASSWORD)]
    pub password: Option<String>,

    /// Send the MD5 digest of the password rather than the password.
    #[arg(short, long)]
    pub digest: bool,

    /// Don't show the HTTP status code.
    #[arg(short = 'c', long)]
    pub hide_status_code: bool,

    /// Don't show the HTTP response headers.
    #[arg(short = 'H', long)]
    pub hide_headers: bool,

    /// Don't show the response body.
    #[arg(short = 'b', long)]
    pub hide_body: bool,

    /// Pretty print the response body.
    #[arg(short = 'P', long)]
    pub pretty_print: bool,

    /// Return right after an async command was accepted.
    #[arg(long)]
    pub no_async_block: bool,

    /// The number of async job status queries before giving up.
    ///
    /// A negative value keeps polling until the job is done, which can
    /// mean forever.
    #[arg(
        long,
        env = CLOUDSTACK_ENV_ASYNC_RETRIES,
        default_value_t = DEFAULT_ASYNC_RETRIES,
        allow_negative_numbers = true,
    )]
    pub async_retries: i64,

    /// Seconds between two async job status queries.
    #[arg(
        long,
        env = CLOUDSTACK_ENV_ASYNC_INTERVAL,
        default_value_t = DEFAULT_ASYNC_INTERVAL_SECS,
    )]
    pub async_interval: u64,

    /// HTTP timeout in seconds.
    #[arg(
        long,
        env = CLOUDSTACK_ENV_TIMEOUT,
        default_value_t = HTTP_CLIENT_TIMEOUT_SECS,
    )]
    pub timeout: u64,

    /// The log level.
    #[arg(long, env = CMONKEY_ENV_LOG_LEVEL, default_value = "warn")]
    pub log_level: LevelFilter,

    /// The API command, e.g. listUsers.
    pub command: String,

    /// Parameters of the command as key=value pairs.
    pub parameters: Vec<String>,
}

impl Options {
    /// Creates the options from the process arguments.
    ///
    /// If the arguments won’t result in usable options, exits the process.
    pub fn from_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Turns the options into what is needed to run one invocation.
    pub fn into_parts(
        self,
    ) -> Result<(Config, Invocation, ReportOptions), ConfigError> {
        let credentials = self.credentials()?;
        let params = parse_parameters(&self.parameters)?;

        let mut config = Config::new(self.entry_point, credentials);
        config.async_block = !self.no_async_block;
        config.retry_limit = self.async_retries;
        config.poll_interval = Duration::from_secs(self.async_interval);
        config.timeout = Duration::from_secs(self.timeout);
        config.log_level = self.log_level;

        let report = ReportOptions {
            status_code: !self.hide_status_code,
            headers: !self.hide_headers,
            body: !self.hide_body,
            pretty: self.pretty_print,
        };

        Ok((
            config,
            Invocation { command: self.command, params },
            report,
        ))
    }

    fn credentials(&self) -> Result<Credentials, ConfigError> {
        match self.auth_type {
            AuthType::Signature => Ok(Credentials::Signature {
                api_key: required(
                    &self.api_key, "api-key", CLOUDSTACK_ENV_API_KEY,
                )?,
                secret_key: required(
                    &self.secret_key, "secret-key", CLOUDSTACK_ENV_SECRET_KEY,
                )?,
            }),
            AuthType::Cookie => Ok(Credentials::Cookie {
                username: required(
                    &self.username, "username", CLOUDSTACK_ENV_USERNAME,
                )?,
                password: required(
                    &self.password, "password", CLOUDSTACK_ENV_PASSWORD,
                )?,
                digest: self.digest,
            }),
            AuthType::Integration => Ok(Credentials::Integration),
        }
    }
}

fn required(
    value: &Option<String>,
    arg: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(ConfigError::missing_arg(arg, env)),
    }
}

/// Parses `key=value` pairs. The value may contain `=` itself.
///
/// Later pairs win over earlier ones with the same key.
pub fn parse_parameters(
    parameters: &[String],
) -> Result<ParameterMap, ConfigError> {
    let mut res = ParameterMap::new();
    for param in parameters {
        match param.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                res.insert(key.to_string(), value.to_string());
            }
            _ => return Err(ConfigError::InvalidParameter(param.clone())),
        }
    }
    Ok(res)
}


//------------ AuthType ------------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum AuthType {
    /// Sign requests with the API and secret key.
    Signature,

    /// Log in with username and password.
    Cookie,

    /// No authentication, for the integration port.
    Integration,
}


//------------ Invocation ----------------------------------------------------

/// A single command to invoke.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub params: ParameterMap,
}


//------------ Tests ---------------------------------------------------------
