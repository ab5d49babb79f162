//! Formatting the response for the user.

use serde_json::Value;

use crate::api::{ApiResponse, HeaderMap};


//------------ ReportOptions -------------------------------------------------

/// Which parts of a response to show, and how.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReportOptions {
    pub status_code: bool,
    pub headers: bool,
    pub body: bool,
    pub pretty: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            status_code: true,
            headers: true,
            body: true,
            pretty: false,
        }
    }
}

impl ReportOptions {
    /// Returns the report for `response`, or `None` if everything is
    /// hidden.
    ///
    /// The status code, the headers as a JSON object and the body each go
    /// on their own line.
    pub fn report(&self, response: &ApiResponse) -> Option<String> {
        let mut parts = Vec::new();

        if self.status_code {
            parts.push(response.status.as_u16().to_string());
        }
        if self.headers {
            parts.push(self.json(&headers_json(&response.headers)));
        }
        if self.body {
            parts.push(self.json(&response.body));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    fn json(&self, value: &Value) -> String {
        if self.pretty {
            format!("{:#}", value)
        } else {
            value.to_string()
        }
    }
}

fn headers_json(headers: &HeaderMap) -> Value {
    Value::Object(
        headers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}


//------------ Tests ---------------------------------------------------------
