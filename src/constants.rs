//! Various cmonkey-wide constants.

//------------ Binary Names -------------------------------------------------

/// The friendly name of the `cmonkey` binary.
pub const CMONKEY_APP: &str = "cmonkey";

/// The version of cmonkey, as used in the user agent.
pub const CMONKEY_VERSION: &str = env!("CARGO_PKG_VERSION");


//------------ Environment Variables ----------------------------------------

/// The environment variable with the API entry point.
pub const CLOUDSTACK_ENV_ENTRY_POINT: &str = "CLOUDSTACK_API_ENTRYPOINT";

/// The environment variable selecting the authentication type.
///
/// Accepted values are “signature,” “cookie” and “integration.”
pub const CLOUDSTACK_ENV_AUTH_TYPE: &str = "CLOUDSTACK_API_AUTHTYPE";

/// The environment variable with the API key for signature authentication.
pub const CLOUDSTACK_ENV_API_KEY: &str = "CLOUDSTACK_API_APIKEY";

/// The environment variable with the secret key for signature
/// authentication.
pub const CLOUDSTACK_ENV_SECRET_KEY: &str = "CLOUDSTACK_API_SECRETKEY";

/// The environment variable with the user name for cookie authentication.
pub const CLOUDSTACK_ENV_USERNAME: &str = "CLOUDSTACK_API_USERNAME";

/// The environment variable with the password for cookie authentication.
pub const CLOUDSTACK_ENV_PASSWORD: &str = "CLOUDSTACK_API_PASSWORD";

/// The environment variable with the number of async job status queries.
pub const CLOUDSTACK_ENV_ASYNC_RETRIES: &str = "CLOUDSTACK_API_ASYNC_RETRIES";

/// The environment variable with the seconds between job status queries.
pub const CLOUDSTACK_ENV_ASYNC_INTERVAL: &str =
    "CLOUDSTACK_API_ASYNC_INTERVAL";

/// The environment variable with the HTTP timeout in seconds.
pub const CLOUDSTACK_ENV_TIMEOUT: &str = "CLOUDSTACK_API_TIMEOUT";

/// The environment variable with the log level.
///
/// The variable should contain the name of a [`log::LevelFilter`]. The
/// default is “warn.”
pub const CMONKEY_ENV_LOG_LEVEL: &str = "CMONKEY_LOG_LEVEL";


//------------ Defaults -----------------------------------------------------

pub const DEFAULT_ENTRY_POINT: &str = "http://localhost:8080/client/api";

/// A negative value means the client keeps polling until the job is done.
pub const DEFAULT_ASYNC_RETRIES: i64 = -1;

pub const DEFAULT_ASYNC_INTERVAL_SECS: u64 = 5;

pub const HTTP_CLIENT_TIMEOUT_SECS: u64 = 60;


//------------ API Names ----------------------------------------------------

/// The parameter that carries the command name.
pub const PARAM_COMMAND: &str = "command";

/// The parameter selecting the response format.
pub const PARAM_RESPONSE: &str = "response";

/// The only response format we understand.
pub const RESPONSE_FORMAT_JSON: &str = "json";

pub const PARAM_API_KEY: &str = "apikey";
pub const PARAM_SIGNATURE: &str = "signature";
pub const PARAM_SESSION_KEY: &str = "sessionkey";
pub const PARAM_JOB_ID: &str = "jobid";

pub const COMMAND_LOGIN: &str = "login";
pub const COMMAND_QUERY_ASYNC_JOB_RESULT: &str = "queryAsyncJobResult";

/// The job status CloudStack reports while an async job is running.
pub const JOB_STATUS_PENDING: i64 = 0;

/// The domain used for cookie logins.
pub const LOGIN_DOMAIN: &str = "/";
