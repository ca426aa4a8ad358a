//! HTTP adapter for the remote tool-execution service.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use taskpilot_application::{ToolEndpoint, ToolEndpointError};
use taskpilot_domain::{ToolArguments, truncate};
use tracing::debug;

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 500;

#[derive(Serialize)]
struct ToolCallRequest<'a> {
    name: &'a str,
    arguments: &'a ToolArguments,
}

/// Tool endpoint reached with `POST {endpoint}/tools/call`.
///
/// The service answers `{"result": ...}` on success and `{"error": "..."}`
/// when the tool itself failed. Anything else is an invalid response.
pub struct HttpToolEndpoint {
    http: reqwest::Client,
    call_url: String,
}

impl HttpToolEndpoint {
    pub fn new(endpoint: &str) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: &str) -> Self {
        let base = endpoint.trim_end_matches('/');
        Self {
            http,
            call_url: format!("{base}/tools/call"),
        }
    }

    pub fn call_url(&self) -> &str {
        &self.call_url
    }
}

#[async_trait]
impl ToolEndpoint for HttpToolEndpoint {
    async fn call(&self, name: &str, arguments: &ToolArguments) -> Result<Value, ToolEndpointError> {
        debug!(tool = name, url = %self.call_url, "Calling tool endpoint");

        let response = self
            .http
            .post(&self.call_url)
            .json(&ToolCallRequest { name, arguments })
            .send()
            .await
            .map_err(|e| ToolEndpointError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolEndpointError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ToolEndpointError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        parse_body(&body)
    }
}

fn parse_body(body: &str) -> Result<Value, ToolEndpointError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        ToolEndpointError::InvalidResponse(format!(
            "{}: {}",
            e,
            truncate(body, MAX_ERROR_BODY)
        ))
    })?;

    let Value::Object(mut map) = value else {
        return Err(ToolEndpointError::InvalidResponse(
            "expected a JSON object".to_string(),
        ));
    };

    match map.remove("error") {
        Some(Value::Null) | None => {}
        Some(Value::String(message)) => return Err(ToolEndpointError::Remote(message)),
        Some(other) => return Err(ToolEndpointError::Remote(other.to_string())),
    }

    map.remove("result").ok_or_else(|| {
        ToolEndpointError::InvalidResponse("missing 'result' field".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args() -> ToolArguments {
        ToolArguments::new()
            .with_arg("title", "Buy milk")
            .with_arg("user_id", "u-1")
    }

    #[tokio::test]
    async fn test_successful_call_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tools/call"))
            .and(body_json(json!({
                "name": "add_task",
                "arguments": {"title": "Buy milk", "user_id": "u-1"}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": {"id": 7, "title": "Buy milk"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = HttpToolEndpoint::new(&server.uri());
        let result = endpoint.call("add_task", &args()).await.unwrap();
        assert_eq!(result, json!({"id": 7, "title": "Buy milk"}));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_endpoint() {
        let endpoint = HttpToolEndpoint::new("http://localhost:8000/mcp/");
        assert_eq!(endpoint.call_url(), "http://localhost:8000/mcp/tools/call");
    }

    #[tokio::test]
    async fn test_error_payload_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tools/call"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "Task 99 not found"})),
            )
            .mount(&server)
            .await;

        let endpoint = HttpToolEndpoint::new(&server.uri());
        let err = endpoint.call("delete_task", &args()).await.unwrap_err();
        assert_eq!(err, ToolEndpointError::Remote("Task 99 not found".to_string()));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_server_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tools/call"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let endpoint = HttpToolEndpoint::new(&server.uri());
        let err = endpoint.call("list_tasks", &ToolArguments::new()).await.unwrap_err();
        assert_eq!(
            err,
            ToolEndpointError::Status {
                status: 503,
                body: "unavailable".to_string()
            }
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tools/call"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let endpoint = HttpToolEndpoint::new(&server.uri());
        let err = endpoint.call("list_tasks", &ToolArguments::new()).await.unwrap_err();
        assert!(matches!(err, ToolEndpointError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Nothing listens on port 1
        let endpoint = HttpToolEndpoint::new("http://127.0.0.1:1");
        let err = endpoint.call("list_tasks", &ToolArguments::new()).await.unwrap_err();
        assert!(matches!(err, ToolEndpointError::Transport(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(r#"{"result": "done"}"#).unwrap(), json!("done"));
        assert_eq!(
            parse_body(r#"{"result": [1, 2], "error": null}"#).unwrap(),
            json!([1, 2])
        );
        assert_eq!(
            parse_body(r#"{"error": {"code": 404}}"#).unwrap_err(),
            ToolEndpointError::Remote(r#"{"code":404}"#.to_string())
        );
        assert!(matches!(
            parse_body(r#"{"status": "ok"}"#),
            Err(ToolEndpointError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_body("[1]"),
            Err(ToolEndpointError::InvalidResponse(_))
        ));
    }
}
