//! The error type of the API client.

use std::fmt;

use openssl::error::ErrorStack;


//------------ Error ---------------------------------------------------------

type ErrorUri = String;
type ErrorMessage = String;

/// Everything that can make an API invocation fail.
///
/// The client never retries on any of these, it aborts the invocation and
/// hands the error to the caller.
#[derive(Debug)]
pub enum Error {
    /// The login sub-request of cookie authentication was rejected.
    LoginFailed(ErrorUri, ErrorMessage),

    /// The request could not be sent or the response not received.
    Transport(ErrorUri, ErrorMessage),

    /// The response body was not valid JSON.
    Decode(ErrorUri, ErrorMessage),

    /// Polling gave up before the async job reached a final status.
    RetryLimitExceeded { job_id: String, attempts: u64 },

    /// The response was JSON but not in the expected shape.
    Response(ErrorUri, ErrorMessage),

    /// The HTTP client could not be set up.
    RequestBuild(ErrorUri, ErrorMessage),

    /// OpenSSL failed to compute a digest.
    Signature(ErrorMessage),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::LoginFailed(uri, msg) => {
                write!(f, "Login failed at URI: {}, error: {}", uri, msg)
            }
            Error::Transport(uri, msg) => {
                write!(f, "Issue accessing URI: {}, error: {}", uri, msg)
            }
            Error::Decode(uri, msg) => write!(
                f,
                "Issue decoding response from URI: {}, error: {}",
                uri, msg
            ),
            Error::RetryLimitExceeded { job_id, attempts } => write!(
                f,
                "Async job {} still pending after {} status queries",
                job_id, attempts
            ),
            Error::Response(uri, msg) => write!(
                f,
                "Issue processing response from URI: {}, error: {}",
                uri, msg
            ),
            Error::RequestBuild(uri, msg) => write!(
                f,
                "Issue creating request for URI: {}, error: {}",
                uri, msg
            ),
            Error::Signature(msg) => {
                write!(f, "Cannot sign request: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn login_failed(uri: &str, msg: impl fmt::Display) -> Self {
        Error::LoginFailed(uri.to_string(), msg.to_string())
    }

    pub fn transport(uri: &str, msg: impl fmt::Display) -> Self {
        Error::Transport(uri.to_string(), msg.to_string())
    }

    pub fn decode(uri: &str, msg: impl fmt::Display) -> Self {
        Error::Decode(uri.to_string(), msg.to_string())
    }

    pub fn response(uri: &str, msg: impl fmt::Display) -> Self {
        Error::Response(uri.to_string(), msg.to_string())
    }

    pub fn request_build(uri: &str, msg: impl fmt::Display) -> Self {
        Error::RequestBuild(uri.to_string(), msg.to_string())
    }
}

impl From<ErrorStack> for Error {
    fn from(e: ErrorStack) -> Self {
        Error::Signature(e.to_string())
    }
}
