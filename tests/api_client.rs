//! Runs the client against a mock CloudStack API server.

use std::time::Duration;

use cmonkey::api::ParameterMap;
use cmonkey::auth::Credentials;
use cmonkey::config::Config;
use cmonkey::{ApiClient, Error};
use reqwest::StatusCode;
use serde_json::json;
use url::Url;
use wiremock::matchers::{
    body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/client/api";

const API_KEY: &str = "B1glHBDDvXwKz4XkLXhd_Hk5-Fp8RZfukbE4shWk2p9nRjPvtMLTtNtawtD1H-a4kh06P0U5eRBELVOl6OAThg";
const SECRET_KEY: &str = "VpznCS2q7t9-Sd8QJJwW_VLm_IX1g3ua9fMasSyD8jD5XBXso3heVG6_3PUcQi5lVWZXXYKoJwcWukv0V7DvCQ";

fn config(server: &MockServer, credentials: Credentials) -> Config {
    let endpoint = Url::parse(&format!("{}{}", server.uri(), API_PATH)).unwrap();
    let mut config = Config::new(endpoint, credentials);
    config.poll_interval = Duration::from_millis(10);
    config.timeout = Duration::from_secs(5);
    config
}

fn params(pairs: &[(&str, &str)]) -> ParameterMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn integration_mode_lists_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("command", "listUsers"))
        .and(query_param("account", "admin"))
        .and(query_param("response", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "listusersresponse": {"count": 1, "user": [{"username": "admin"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server, Credentials::Integration)).unwrap();
    let res = client
        .invoke("listUsers", params(&[("account", "admin")]))
        .await
        .unwrap();

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["listusersresponse"]["count"], 1);
    assert!(res.headers.contains_key("content-type"));

    let received = server.received_requests().await.unwrap();
    let query: Vec<(String, String)> = received[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(!query.iter().any(|(k, _)| k == "apikey" || k == "signature" || k == "sessionkey"));
}

#[tokio::test]
async fn signature_mode_sends_signature() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("command", "listUsers"))
        .and(query_param("apikey", API_KEY))
        .and(query_param("signature", "6Ua0WmXgNYVK6IMImnGPyA2MOUY="))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"listusersresponse": {"count": 0}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Credentials::Signature {
        api_key: API_KEY.into(),
        secret_key: SECRET_KEY.into(),
    };
    let client = ApiClient::new(&config(&server, credentials)).unwrap();
    let res = client
        .invoke("listUsers", params(&[("keyword", "ad")]))
        .await
        .unwrap();

    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn cookie_mode_sends_session_key_and_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(query_param("response", "json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("command=login"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=password"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=abc123; Path=/")
                .set_body_json(json!({
                    "loginresponse": {"sessionkey": "s3ss10n", "username": "admin"}
                })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("command", "listUsers"))
        .and(query_param("sessionkey", "s3ss10n"))
        .and(header("cookie", "JSESSIONID=abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"listusersresponse": {"count": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Credentials::Cookie {
        username: "admin".into(),
        password: "password".into(),
        digest: false,
    };
    let client = ApiClient::new(&config(&server, credentials)).unwrap();
    let res = client.invoke("listUsers", ParameterMap::new()).await.unwrap();

    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn rejected_login_sends_no_command() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "loginresponse": {"errorcode": 401, "errortext": "unable to verify user credentials"}
        })))
        .mount(&server)
        .await;

    let credentials = Credentials::Cookie {
        username: "admin".into(),
        password: "wrong".into(),
        digest: true,
    };
    let client = ApiClient::new(&config(&server, credentials)).unwrap();
    let err = client
        .invoke("listUsers", ParameterMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::LoginFailed(_, _)));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn async_command_waits_for_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("command", "deployVirtualMachine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deployvirtualmachineresponse": {"id": "vm-1", "jobid": "j-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("command", "queryAsyncJobResult"))
        .and(query_param("jobid", "j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queryasyncjobresultresponse": {"jobid": "j-1", "jobstatus": 0}
        })))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("command", "queryAsyncJobResult"))
        .and(query_param("jobid", "j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queryasyncjobresultresponse": {"jobid": "j-1", "jobstatus": 1}
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server, Credentials::Integration)).unwrap();
    let res = client
        .invoke("deployVirtualMachine", params(&[("zoneid", "z-1")]))
        .await
        .unwrap();

    assert_eq!(res.body["deployvirtualmachineresponse"]["jobid"], "j-1");
    let job = res.job.unwrap();
    assert_eq!(job.job_status, 1);
    assert_eq!(job.attempts, 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn error_response_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(431).set_body_json(json!({
            "listusersresponse": {"errorcode": 431, "errortext": "Unknown parameter"}
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server, Credentials::Integration)).unwrap();
    let res = client.invoke("listUsers", ParameterMap::new()).await.unwrap();

    assert_eq!(res.status.as_u16(), 431);
    assert_eq!(res.body["listusersresponse"]["errorcode"], 431);
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Apache Tomcat</html>"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server, Credentials::Integration)).unwrap();
    let err = client
        .invoke("listUsers", ParameterMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_, _)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let endpoint = Url::parse("http://127.0.0.1:1/client/api").unwrap();
    let client = ApiClient::new(&Config::new(endpoint, Credentials::Integration)).unwrap();
    let err = client
        .invoke("listUsers", ParameterMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_, _)));
}

#[tokio::test]
async fn cookie_mode_logs_in_once_while_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("command=login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=abc123; Path=/")
                .set_body_json(json!({"loginresponse": {"sessionkey": "s3ss10n"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("command", "deployVirtualMachine"))
        .and(query_param("sessionkey", "s3ss10n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deployvirtualmachineresponse": {"id": "vm-1", "jobid": "j-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("command", "queryAsyncJobResult"))
        .and(query_param("sessionkey", "s3ss10n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queryasyncjobresultresponse": {"jobid": "j-1", "jobstatus": 0}
        })))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("command", "queryAsyncJobResult"))
        .and(query_param("sessionkey", "s3ss10n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queryasyncjobresultresponse": {"jobid": "j-1", "jobstatus": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Credentials::Cookie {
        username: "admin".into(),
        password: "password".into(),
        digest: false,
    };
    let client = ApiClient::new(&config(&server, credentials)).unwrap();
    let res = client
        .invoke("deployVirtualMachine", ParameterMap::new())
        .await
        .unwrap();

    assert_eq!(res.job.unwrap().attempts, 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}
