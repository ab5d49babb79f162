//! The `cmonkey` command line tool.

pub mod options;
pub mod report;

pub use self::options::{Invocation, Options};
pub use self::report::ReportOptions;

use log::info;

use crate::api::ApiResponse;
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Error;


//------------ Exit Codes ----------------------------------------------------

/// The response had a 2xx status.
pub const EXIT_OK: i32 = 0;

/// The server answered with a status other than 2xx.
pub const EXIT_STATUS_ERROR: i32 = 1;

/// The arguments or environment did not make a usable configuration.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// The invocation itself failed.
pub const EXIT_API_ERROR: i32 = 3;


//------------ run -----------------------------------------------------------

/// Invokes the command and prints the report to stdout.
///
/// Returns the response so the caller can pick the exit code.
pub async fn run(
    config: &Config,
    invocation: Invocation,
    report: &ReportOptions,
) -> Result<ApiResponse, Error> {
    let client = ApiClient::new(config)?;
    let res = client.invoke(&invocation.command, invocation.params).await?;

    if let Some(job) = &res.job {
        info!(
            "Async job {} finished with status {}",
            job.job_id, job.job_status
        );
    }
    if let Some(text) = report.report(&res) {
        println!("{}", text);
    }
    Ok(res)
}

/// Returns the exit code for a response.
pub fn exit_code(response: &ApiResponse) -> i32 {
    if response.status.is_success() {
        EXIT_OK
    } else {
        EXIT_STATUS_ERROR
    }
}


//------------ Tests ---------------------------------------------------------

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::api::HeaderMap;

    fn response(status: u16) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: json!({}),
            job: None,
        }
    }

    #[test]
    fn should_map_status_to_exit_code() {
        assert_eq!(exit_code(&response(200)), EXIT_OK);
        assert_eq!(exit_code(&response(204)), EXIT_OK);
        assert_eq!(exit_code(&response(431)), EXIT_STATUS_ERROR);
        assert_eq!(exit_code(&response(530)), EXIT_STATUS_ERROR);
    }
}
