//! Waiting for async jobs.

use std::time::Duration;

use log::{info, trace};
use serde_json::Value;

use crate::api::{JobResult, ParameterMap};
use crate::auth::Session;
use crate::constants::{
    COMMAND_QUERY_ASYNC_JOB_RESULT, JOB_STATUS_PENDING, PARAM_JOB_ID,
};
use crate::error::Error;
use super::httpclient::HttpInvoker;


//------------ AsyncJobPoller ------------------------------------------------

/// Polls `queryAsyncJobResult` until a job leaves the pending state.
///
/// This blocks the invocation; nothing runs concurrently with the poll
/// loop.
#[derive(Clone, Copy, Debug)]
pub struct AsyncJobPoller {
    retry_limit: i64,
    interval: Duration,
}

impl AsyncJobPoller {
    /// Creates a poller doing at most `retry_limit` status queries.
    ///
    /// A negative limit means no limit at all: a job that never finishes
    /// then blocks the caller forever.
    pub fn new(retry_limit: i64, interval: Duration) -> Self {
        AsyncJobPoller { retry_limit, interval }
    }

    pub fn max_attempts(&self) -> u64 {
        u64::try_from(self.retry_limit).unwrap_or(u64::MAX)
    }

    /// Waits for the job submitted by the response `body`, if any.
    ///
    /// Returns `Ok(None)` without any further request if `body` is the
    /// response of a synchronous command. All status queries are produced
    /// from `session`.
    pub async fn block<I: HttpInvoker>(
        &self,
        session: &Session<'_>,
        invoker: &I,
        body: &Value,
    ) -> Result<Option<JobResult>, Error> {
        let job_id = match job_id(body) {
            Some(job_id) => job_id,
            None => return Ok(None),
        };
        info!("Waiting for async job {}", job_id);

        let max_attempts = self.max_attempts();
        let mut attempts = 0;
        while attempts < max_attempts {
            attempts += 1;

            let mut params = ParameterMap::new();
            params.insert(PARAM_JOB_ID.into(), job_id.clone());
            let res = super::send(
                session, invoker, COMMAND_QUERY_ASYNC_JOB_RESULT, params,
            )
            .await?;

            let job_status = job_status(&res.body).ok_or_else(|| {
                Error::response(
                    invoker.endpoint().as_str(),
                    format!("no job status for async job {}", job_id),
                )
            })?;
            trace!(
                "Async job {} has status {} after {} queries",
                job_id, job_status, attempts
            );

            if job_status != JOB_STATUS_PENDING {
                info!("Async job {} done with status {}", job_id, job_status);
                return Ok(Some(JobResult {
                    job_id,
                    job_status,
                    attempts,
                    body: res.body,
                }));
            }

            if attempts < max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        Err(Error::RetryLimitExceeded { job_id, attempts })
    }
}

/// Returns the job ID if `body` is the response of an async command.
///
/// Every response is wrapped in a single object named after the command,
/// so only the first value is looked at.
fn job_id(body: &Value) -> Option<String> {
    let inner = body.as_object()?.values().next()?;
    match inner.get(PARAM_JOB_ID)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the job status from a `queryAsyncJobResult` response.
fn job_status(body: &Value) -> Option<i64> {
    match body.get("queryasyncjobresultresponse")?.get("jobstatus")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}


//------------ Tests ---------------------------------------------------------
