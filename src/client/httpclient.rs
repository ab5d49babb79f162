//! Sending requests to the API endpoint.
use std::future::Future;
use std::time::Duration;

use log::{debug, trace};
use reqwest::header::HeaderValue;
use url::Url;

use crate::api::{HeaderMap, PreparedRequest, RawResponse};
use crate::constants::{CMONKEY_APP, CMONKEY_VERSION};
use crate::error::Error;


//------------ HttpInvoker ---------------------------------------------------

/// Executes prepared requests against a fixed endpoint.
///
/// Implementations must not retry.
pub trait HttpInvoker {
    /// The endpoint all requests are sent to.
    fn endpoint(&self) -> &Url;

    /// Sends a single request and decodes the JSON response body.
    ///
    /// The body is decoded whatever the status code, since CloudStack
    /// reports errors as JSON too.
    fn execute(
        &self,
        request: PreparedRequest,
    ) -> impl Future<Output = Result<RawResponse, Error>>;
}


//------------ ReqwestInvoker ------------------------------------------------

/// The [`HttpInvoker`] used against a real CloudStack server.
///
/// It keeps cookies between requests: the session cookie returned by a
/// login has to accompany the requests made with its session key.
#[derive(Clone, Debug)]
pub struct ReqwestInvoker {
    endpoint: Url,
    client: reqwest::Client,
}

impl ReqwestInvoker {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .cookie_store(true)
            .user_agent(format!("{}/{}", CMONKEY_APP, CMONKEY_VERSION))
            .build()
            .map_err(|e| Error::request_build(endpoint.as_str(), e))?;
        Ok(ReqwestInvoker { endpoint, client })
    }
}

impl HttpInvoker for ReqwestInvoker {
    fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn execute(
        &self,
        request: PreparedRequest,
    ) -> Result<RawResponse, Error> {
        let uri = self.endpoint.as_str();
        debug!(
            "{} {} command={}",
            request.method,
            uri,
            request.command().unwrap_or("<none>")
        );

        let mut builder = self
            .client
            .request(request.method, self.endpoint.clone())
            .query(&request.params);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        // Headers first: the form must not add a second content type.
        if let Some(form) = &request.body {
            builder = builder.form(form);
        }

        let res = builder
            .send()
            .await
            .map_err(|e| Error::transport(uri, e))?;

        let status = res.status();
        trace!("Got status {} from {}", status, uri);
        let headers = collect_headers(res.headers());

        let text = res
            .text()
            .await
            .map_err(|e| Error::transport(uri, e))?;
        let body = serde_json::from_str(&text).map_err(|e| {
            Error::decode(uri, format!("could not parse JSON response: {e}"))
        })?;

        Ok(RawResponse { status, headers, body })
    }
}

/// Repeated headers are joined with a comma.
fn collect_headers(headers: &reqwest::header::HeaderMap) -> HeaderMap {
    let mut res = HeaderMap::new();
    for (name, value) in headers {
        let value = header_str(value);
        match res.get_mut(name.as_str()) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                res.insert(name.as_str().to_string(), value);
            }
        }
    }
    res
}

fn header_str(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}


//------------ Tests ---------------------------------------------------------
