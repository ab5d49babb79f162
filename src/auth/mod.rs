//! Authentication of API requests.
//!
//! CloudStack accepts three ways of calling its API: requests signed with
//! an API key and secret, requests carrying a session key obtained through
//! a username/password login, and plain unauthenticated requests on the
//! integration port. Each is an [`AuthStrategy`] variant. Per invocation it
//! yields a [`Session`] that turns a command and its parameters into a
//! [`PreparedRequest`].

mod session;
mod signature;

pub use self::session::SessionLogin;
pub use self::signature::SignatureBuilder;

use crate::api::{ParameterMap, PreparedRequest};
use crate::client::httpclient::HttpInvoker;
use crate::constants::{PARAM_COMMAND, PARAM_SESSION_KEY, PARAM_SIGNATURE};
use crate::error::Error;


//------------ Credentials ---------------------------------------------------

/// The credentials the client is configured with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Credentials {
    Signature {
        api_key: String,
        secret_key: String,
    },
    Cookie {
        username: String,
        password: String,
        digest: bool,
    },
    Integration,
}


//------------ AuthStrategy --------------------------------------------------

#[derive(Clone, Debug)]
pub enum AuthStrategy {
    /// Sign every request with HMAC-SHA1.
    Signature(SignatureBuilder),

    /// Log in once per invocation and pass on the session key.
    Cookie(SessionLogin),

    /// Add nothing. For trusted networks only.
    Integration,
}

impl AuthStrategy {
    /// Starts the authenticated part of one invocation.
    ///
    /// The cookie variant performs its login through `invoker` here, so
    /// all requests produced from the returned session share one session
    /// key.
    pub async fn authenticate<I: HttpInvoker>(
        &self,
        invoker: &I,
    ) -> Result<Session<'_>, Error> {
        match self {
            AuthStrategy::Signature(builder) => Ok(Session::Signature(builder)),
            AuthStrategy::Cookie(login) => {
                Ok(Session::Cookie(login.login(invoker).await?))
            }
            AuthStrategy::Integration => Ok(Session::Integration),
        }
    }
}

impl From<Credentials> for AuthStrategy {
    fn from(credentials: Credentials) -> Self {
        match credentials {
            Credentials::Signature { api_key, secret_key } => {
                AuthStrategy::Signature(SignatureBuilder::new(
                    api_key, secret_key,
                ))
            }
            Credentials::Cookie { username, password, digest } => {
                AuthStrategy::Cookie(SessionLogin::new(
                    username, password, digest,
                ))
            }
            Credentials::Integration => AuthStrategy::Integration,
        }
    }
}


//------------ Session -------------------------------------------------------

/// The credentials of a single invocation.
///
/// Lives for one `invoke` call: the primary request and all of its job
/// status queries are produced from the same session.
#[derive(Clone, Debug)]
pub enum Session<'a> {
    Signature(&'a SignatureBuilder),

    /// Holds the session key obtained by the login.
    Cookie(String),

    Integration,
}

impl Session<'_> {
    /// Produces the request for `command` with the given parameters.
    pub fn produce(
        &self,
        command: &str,
        mut params: ParameterMap,
    ) -> Result<PreparedRequest, Error> {
        params.insert(PARAM_COMMAND.into(), command.into());
        match self {
            Session::Signature(builder) => {
                let signature = builder.build(&mut params)?;
                params.insert(PARAM_SIGNATURE.into(), signature);
            }
            Session::Cookie(session_key) => {
                params.insert(PARAM_SESSION_KEY.into(), session_key.clone());
            }
            Session::Integration => {}
        }
        Ok(PreparedRequest::get(params))
    }
}


//------------ Tests ---------------------------------------------------------
