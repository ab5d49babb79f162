//! The API client.

pub mod httpclient;
mod poller;

pub use self::httpclient::{HttpInvoker, ReqwestInvoker};
pub use self::poller::AsyncJobPoller;

use log::debug;

use crate::api::{ApiResponse, ParameterMap, RawResponse};
use crate::auth::{AuthStrategy, Session};
use crate::config::Config;
use crate::constants::{PARAM_RESPONSE, RESPONSE_FORMAT_JSON};
use crate::error::Error;


//------------ ApiClient -----------------------------------------------------

/// Invokes CloudStack API commands.
///
/// A client can be used for any number of invocations, one after the
/// other. Each invocation performs at most one login, one request for the
/// command itself and then, for async commands, the job status queries.
/// The session key of a login is only used within its invocation.
pub struct ApiClient<I = ReqwestInvoker> {
    auth: AuthStrategy,
    invoker: I,
    poller: AsyncJobPoller,
    async_block: bool,
}

impl ApiClient<ReqwestInvoker> {
    /// Creates a client talking to the endpoint of `config`.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let invoker =
            ReqwestInvoker::new(config.endpoint.clone(), config.timeout)?;
        Ok(Self::with_invoker(config, invoker))
    }
}

impl<I: HttpInvoker> ApiClient<I> {
    /// Creates a client sending its requests through `invoker`.
    ///
    /// The endpoint of `config` is ignored in favour of the invoker's.
    pub fn with_invoker(config: &Config, invoker: I) -> Self {
        ApiClient {
            auth: config.credentials.clone().into(),
            invoker,
            poller: AsyncJobPoller::new(
                config.retry_limit,
                config.poll_interval,
            ),
            async_block: config.async_block,
        }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Invokes `command` with the given parameters.
    ///
    /// If async blocking is enabled and the command started an async job,
    /// this only returns once the job is finished. The returned response
    /// is still that of the command itself; the job outcome is in
    /// [`ApiResponse::job`].
    pub async fn invoke(
        &self,
        command: &str,
        params: ParameterMap,
    ) -> Result<ApiResponse, Error> {
        debug!("Invoking {}", command);
        let session = self.auth.authenticate(&self.invoker).await?;
        let res = send(&session, &self.invoker, command, params).await?;

        let job = if self.async_block {
            self.poller.block(&session, &self.invoker, &res.body).await?
        } else {
            None
        };

        Ok(ApiResponse::new(res, job))
    }
}

/// Sends a single command within `session`, asking for a JSON response.
async fn send<I: HttpInvoker>(
    session: &Session<'_>,
    invoker: &I,
    command: &str,
    mut params: ParameterMap,
) -> Result<RawResponse, Error> {
    params.insert(PARAM_RESPONSE.into(), RESPONSE_FORMAT_JSON.into());
    let request = session.produce(command, params)?;
    invoker.execute(request).await
}


//------------ Tests ---------------------------------------------------------
