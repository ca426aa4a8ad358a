//! Completion gateway for OpenRouter and other OpenAI-compatible services.

use super::wire::{ApiError, ChatRequest, ChatResponse, WireMessage};
use crate::config::CompletionSettings;
use crate::tools::JsonSchemaToolConverter;
use async_trait::async_trait;
use reqwest::StatusCode;
use taskpilot_application::{CompletionError, CompletionGateway};
use taskpilot_domain::{CompletionResult, Conversation, ToolDefinition, truncate};
use tracing::{debug, warn};

const MAX_ERROR_BODY: usize = 500;
const APP_TITLE: &str = "taskpilot";

/// Gateway speaking the chat completions API.
///
/// One `complete` call is one HTTP request. Retries and timeouts belong to
/// the caller; this type only classifies failures.
pub struct OpenRouterGateway {
    http: reqwest::Client,
    completions_url: String,
    api_key: String,
    model: String,
    converter: JsonSchemaToolConverter,
}

impl OpenRouterGateway {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), api_key, base_url, model)
    }

    pub fn with_client(
        http: reqwest::Client,
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
    ) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            http,
            completions_url: format!("{base}/chat/completions"),
            api_key: api_key.into(),
            model: model.into(),
            converter: JsonSchemaToolConverter,
        }
    }

    pub fn from_settings(settings: &CompletionSettings) -> Self {
        Self::new(
            settings.api_key.clone(),
            &settings.base_url,
            settings.model.clone(),
        )
    }

    fn build_request<'a>(
        &'a self,
        conversation: &'a Conversation,
        tools: &[ToolDefinition],
    ) -> ChatRequest<'a> {
        let tools = self.converter.all_tools_schema(tools);
        let tool_choice = (!tools.is_empty()).then_some("auto");
        ChatRequest {
            model: &self.model,
            messages: conversation.messages().iter().map(WireMessage::from).collect(),
            tools,
            tool_choice,
        }
    }
}

#[async_trait]
impl CompletionGateway for OpenRouterGateway {
    async fn complete(
        &self,
        conversation: &Conversation,
        tools: &[ToolDefinition],
    ) -> Result<CompletionResult, CompletionError> {
        let request = self.build_request(conversation, tools);

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transient(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Transient(e.to_string()))?;

        if !status.is_success() {
            let message = extract_error_message(&body)
                .unwrap_or_else(|| truncate(&body, MAX_ERROR_BODY));
            warn!(status = status.as_u16(), error = %message, "Completion request failed");
            return Err(classify_status(status, message));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            CompletionError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(match parsed.error {
                Some(error) => classify_api_error(error),
                None => CompletionError::InvalidResponse("response contained no choices".to_string()),
            });
        };

        debug!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            tool_calls = choice.message.tool_calls.as_ref().map_or(0, Vec::len),
            "Chat completion response received"
        );

        Ok(choice.message.into_result())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn classify_status(status: StatusCode, message: String) -> CompletionError {
    match status.as_u16() {
        401 | 403 => CompletionError::Authentication(message),
        429 => CompletionError::Transient(format!("rate limited: {message}")),
        s if s >= 500 => CompletionError::Transient(format!("HTTP {s}: {message}")),
        s => CompletionError::Rejected { status: s, message },
    }
}

fn classify_api_error(error: ApiError) -> CompletionError {
    match error.status().and_then(|s| StatusCode::from_u16(s).ok()) {
        Some(status) if !status.is_success() => classify_status(status, error.message),
        _ => CompletionError::Transient(error.message),
    }
}

/// `error.message` from an error body, if the body has that shape
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]["message"]
        .as_str()
        .or_else(|| value["error"].as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::task_assistant_registry;
    use serde_json::json;
    use taskpilot_domain::Message;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn conversation() -> Conversation {
        let mut conversation = Conversation::with_system_prompt("You manage tasks.");
        conversation.append(Message::user("Add buy milk")).unwrap();
        conversation
    }

    fn gateway(server: &MockServer) -> OpenRouterGateway {
        OpenRouterGateway::new("sk-mock-key", &server.uri(), "test-model")
    }

    async fn respond(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn text_body(content: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "gen-1",
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_final_text_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-mock-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body(json!("Done!"))))
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway(&server).complete(&conversation(), &[]).await.unwrap();
        assert_eq!(result, CompletionResult::Final("Done!".to_string()));
    }

    #[tokio::test]
    async fn test_tool_call_response_keeps_raw_arguments() {
        let server = MockServer::start().await;
        respond(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_abc",
                            "type": "function",
                            "function": {"name": "add_task", "arguments": "{\"title\": \"Buy milk\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })),
        )
        .await;

        let registry = task_assistant_registry().unwrap();
        let result = gateway(&server)
            .complete(&conversation(), registry.definitions())
            .await
            .unwrap();

        let calls = result.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_abc");
        assert_eq!(calls[0].name, "add_task");
        assert_eq!(calls[0].arguments, "{\"title\": \"Buy milk\"}");
    }

    #[tokio::test]
    async fn test_request_carries_history_and_catalog() {
        let server = MockServer::start().await;
        respond(
            &server,
            ResponseTemplate::new(200).set_body_json(text_body(json!("ok"))),
        )
        .await;

        let registry = task_assistant_registry().unwrap();
        gateway(&server)
            .complete(&conversation(), registry.definitions())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = requests[0].body_json().unwrap();

        assert_eq!(body["model"], "test-model");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Add buy milk");

        let names: Vec<&str> = body["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap())
            .collect();
        let expected: Vec<&str> = registry.names().collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_no_tools_omits_tool_fields() {
        let server = MockServer::start().await;
        respond(
            &server,
            ResponseTemplate::new(200).set_body_json(text_body(json!("ok"))),
        )
        .await;

        gateway(&server).complete(&conversation(), &[]).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[tokio::test]
    async fn test_empty_message_is_empty_final() {
        let server = MockServer::start().await;
        respond(
            &server,
            ResponseTemplate::new(200).set_body_json(text_body(serde_json::Value::Null)),
        )
        .await;

        let result = gateway(&server).complete(&conversation(), &[]).await.unwrap();
        assert_eq!(result, CompletionResult::Final(String::new()));
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let server = MockServer::start().await;
        respond(
            &server,
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "No auth credentials found", "code": 401}})),
        )
        .await;

        let err = gateway(&server).complete(&conversation(), &[]).await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::Authentication("No auth credentials found".to_string())
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_server_error_and_rate_limit_are_transient() {
        for status in [429u16, 500, 503] {
            let server = MockServer::start().await;
            respond(&server, ResponseTemplate::new(status).set_body_string("busy")).await;

            let err = gateway(&server).complete(&conversation(), &[]).await.unwrap_err();
            assert!(
                matches!(err, CompletionError::Transient(_)),
                "status {status} gave {err:?}"
            );
            assert!(err.is_retryable());
        }
    }

    #[tokio::test]
    async fn test_bad_request_is_rejected() {
        let server = MockServer::start().await;
        respond(
            &server,
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": {"message": "unknown-model is not a valid model ID"}})),
        )
        .await;

        let err = gateway(&server).complete(&conversation(), &[]).await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::Rejected {
                status: 400,
                message: "unknown-model is not a valid model ID".to_string()
            }
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        respond(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

        let err = gateway(&server).complete(&conversation(), &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let server = MockServer::start().await;
        respond(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"choices": []})),
        )
        .await;

        let err = gateway(&server).complete(&conversation(), &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_error_object_with_ok_status() {
        let server = MockServer::start().await;
        respond(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"error": {"message": "Upstream provider error", "code": 502}})),
        )
        .await;

        let err = gateway(&server).complete(&conversation(), &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Transient(ref m) if m.contains("Upstream")));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transient() {
        let gateway = OpenRouterGateway::new("sk", "http://127.0.0.1:1/api/v1", "m");
        let err = gateway.complete(&conversation(), &[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Transient(_)));
    }

    #[test]
    fn test_model_name() {
        let gateway = OpenRouterGateway::new("sk", "https://openrouter.ai/api/v1/", "openai/gpt-4o");
        assert_eq!(gateway.model_name(), "openai/gpt-4o");
        assert_eq!(
            gateway.completions_url,
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }
}
