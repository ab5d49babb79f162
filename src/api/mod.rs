//! Data types passed between the parts of the API client.

use std::collections::BTreeMap;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::constants::PARAM_COMMAND;


//------------ ParameterMap --------------------------------------------------

/// The arguments of an API call.
///
/// The authentication strategies add their own keys such as `command`,
/// `apikey` or `sessionkey` before the request is sent.
pub type ParameterMap = BTreeMap<String, String>;

/// Request or response headers, by name.
pub type HeaderMap = BTreeMap<String, String>;


//------------ PreparedRequest -----------------------------------------------

/// A fully formed request, ready to be sent to the API endpoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,

    /// Sent as the query string.
    pub params: ParameterMap,

    pub headers: HeaderMap,

    /// Sent as a form-encoded body, if present.
    pub body: Option<ParameterMap>,
}

impl PreparedRequest {
    /// Creates a GET request with the given query parameters.
    pub fn get(params: ParameterMap) -> Self {
        PreparedRequest {
            method: Method::GET,
            params,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a POST request carrying a form-encoded body.
    pub fn post_form(
        params: ParameterMap,
        headers: HeaderMap,
        body: ParameterMap,
    ) -> Self {
        PreparedRequest {
            method: Method::POST,
            params,
            headers,
            body: Some(body),
        }
    }

    /// Returns the API command of this request, if any.
    pub fn command(&self) -> Option<&str> {
        self.params
            .get(PARAM_COMMAND)
            .or_else(|| self.body.as_ref()?.get(PARAM_COMMAND))
            .map(String::as_str)
    }
}


//------------ RawResponse ---------------------------------------------------

/// What came back for a single HTTP request.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}


//------------ JobResult -----------------------------------------------------

/// The outcome of waiting for an async job.
///
/// The job status is passed on as reported. CloudStack commonly uses 1 for
/// success and 2 for failure, but all we rely on is that 0 means pending.
#[derive(Clone, Debug, PartialEq)]
pub struct JobResult {
    pub job_id: String,
    pub job_status: i64,

    /// The number of status queries that were needed.
    pub attempts: u64,

    /// The body of the final `queryAsyncJobResult` response.
    pub body: Value,
}


//------------ ApiResponse ---------------------------------------------------

/// The result of invoking a command.
///
/// Status, headers and body are those of the command's own response, even
/// if the client waited for an async job afterwards. The outcome of that
/// wait is found in `job`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub job: Option<JobResult>,
}

impl ApiResponse {
    pub fn new(response: RawResponse, job: Option<JobResult>) -> Self {
        ApiResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
            job,
        }
    }
}
