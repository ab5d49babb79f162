//! Username and password login for cookie authentication.

use log::debug;
use openssl::hash::{hash, MessageDigest};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::api::{HeaderMap, ParameterMap, PreparedRequest};
use crate::client::httpclient::HttpInvoker;
use crate::constants::{
    COMMAND_LOGIN, LOGIN_DOMAIN, PARAM_COMMAND, PARAM_RESPONSE,
    RESPONSE_FORMAT_JSON,
};
use crate::error::Error;

const FORM_CONTENT: &str = "application/x-www-form-urlencoded";


//------------ SessionLogin --------------------------------------------------

/// Exchanges a username and password for a session key.
#[derive(Clone, Debug)]
pub struct SessionLogin {
    username: String,
    password: String,

    /// Send the MD5 hex digest instead of the plain password.
    digest: bool,
}

impl SessionLogin {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        digest: bool,
    ) -> Self {
        SessionLogin {
            username: username.into(),
            password: password.into(),
            digest,
        }
    }

    /// Logs in and returns the session key.
    ///
    /// The session cookie set by the server is kept by the invoker.
    pub async fn login<I: HttpInvoker>(
        &self,
        invoker: &I,
    ) -> Result<String, Error> {
        let uri = invoker.endpoint().to_string();
        debug!("Logging in as '{}' at {}", self.username, uri);

        let res = invoker.execute(self.login_request()?).await?;
        if res.status != StatusCode::OK {
            return Err(Error::login_failed(
                &uri,
                format!("unexpected status code {}", res.status),
            ));
        }

        let login: LoginResponse =
            serde_json::from_value(res.body).map_err(|e| {
                Error::login_failed(&uri, format!("no session key: {}", e))
            })?;
        Ok(login.loginresponse.sessionkey)
    }

    /// Creates the form POST for the `login` command.
    pub fn login_request(&self) -> Result<PreparedRequest, Error> {
        let mut params = ParameterMap::new();
        params.insert(PARAM_RESPONSE.into(), RESPONSE_FORMAT_JSON.into());

        let mut headers = HeaderMap::new();
        headers.insert("Content-Type".into(), FORM_CONTENT.into());

        let password = if self.digest {
            md5_hex(&self.password)?
        } else {
            self.password.clone()
        };

        let mut body = ParameterMap::new();
        body.insert(PARAM_COMMAND.into(), COMMAND_LOGIN.into());
        body.insert("username".into(), self.username.clone());
        body.insert("password".into(), password);
        body.insert("domain".into(), LOGIN_DOMAIN.into());

        Ok(PreparedRequest::post_form(params, headers, body))
    }
}

fn md5_hex(s: &str) -> Result<String, Error> {
    let digest = hash(MessageDigest::md5(), s.as_bytes())?;
    Ok(hex::encode(&*digest))
}


//------------ LoginResponse -------------------------------------------------

#[derive(Deserialize)]
struct LoginResponse {
    loginresponse: LoginDetails,
}

#[derive(Deserialize)]
struct LoginDetails {
    sessionkey: String,
}


//------------ Tests ---------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test::ScriptedInvoker;

    fn expected_login(password: &str) -> PreparedRequest {
        let mut params = ParameterMap::new();
        params.insert("response".into(), "json".into());
        let mut headers = HeaderMap::new();
        headers.insert(
            "Content-Type".into(),
            "application/x-www-form-urlencoded".into(),
        );
        let mut body = ParameterMap::new();
        body.insert("command".into(), "login".into());
        body.insert("username".into(), "admin".into());
        body.insert("password".into(), password.into());
        body.insert("domain".into(), "/".into());
        PreparedRequest::post_form(params, headers, body)
    }

    #[test]
    fn should_send_plain_password() {
        let login = SessionLogin::new("admin", "password", false);
        assert_eq!(login.login_request().unwrap(), expected_login("password"));
    }

    #[test]
    fn should_send_password_digest() {
        let login = SessionLogin::new("admin", "password", true);
        assert_eq!(
            login.login_request().unwrap(),
            expected_login("5f4dcc3b5aa765d61d8327deb882cf99")
        );
    }

    #[tokio::test]
    async fn should_extract_session_key() {
        let invoker = ScriptedInvoker::new().respond(
            StatusCode::OK,
            json!({"loginresponse": {"sessionkey": "hoge", "username": "admin"}}),
        );
        let login = SessionLogin::new("admin", "password", false);

        assert_eq!(login.login(&invoker).await.unwrap(), "hoge");
        assert_eq!(invoker.requests(), vec![expected_login("password")]);
    }

    #[tokio::test]
    async fn should_fail_on_rejected_login() {
        let invoker = ScriptedInvoker::new().respond(
            StatusCode::UNAUTHORIZED,
            json!({"loginresponse": {"errorcode": 401, "errortext": "unable to verify user credentials"}}),
        );
        let login = SessionLogin::new("admin", "wrong", false);

        let err = login.login(&invoker).await.unwrap_err();
        assert!(matches!(err, Error::LoginFailed(_, _)));
    }

    #[tokio::test]
    async fn should_fail_without_session_key() {
        let invoker = ScriptedInvoker::new()
            .respond(StatusCode::OK, json!({"loginresponse": {}}));
        let login = SessionLogin::new("admin", "password", false);

        let err = login.login(&invoker).await.unwrap_err();
        assert!(matches!(err, Error::LoginFailed(_, _)));
    }
}
