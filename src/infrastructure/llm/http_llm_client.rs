//! OpenAI-compatible chat-completion client.
//!
//! Works against any server exposing `POST {base_url}/chat/completions`
//! (Ollama, vLLM, llama.cpp server, OpenAI itself).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::llm::{LlmTransport, MAX_TOKENS, TEMPERATURE};

/// A message in a chat-completion exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

impl ChatCompletionResponse {
    /// Decode a raw response body and take its first choice
    pub fn text_from_body(body: &str) -> AgentResult<String> {
        serde_json::from_str::<Self>(body)?.into_text()
    }

    /// Content of the first choice
    pub fn into_text(self) -> AgentResult<String> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AgentError::EmptyChoices)
    }
}

/// HTTP chat-completion client.
pub struct HttpLlmClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl HttpLlmClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Request body for one system + user exchange.
    pub fn build_request<'a>(
        model: &'a str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model,
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)],
            stream: false,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl LlmTransport for HttpLlmClient {
    async fn chat(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> AgentResult<String> {
        let body = Self::build_request(model, system_prompt, user_prompt);

        let mut request = self.http.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AgentError::HttpStatus(status));
        }

        let body = resp.text().await?;
        ChatCompletionResponse::text_from_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_two_messages_and_fixed_sampling() {
        let req = HttpLlmClient::build_request("llama3:8b", "persona", "idea");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["model"], "llama3:8b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["max_tokens"], 500);
        assert!((json["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "persona");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "idea");
    }

    #[test]
    fn response_yields_first_choice_content() {
        let resp: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"verdict"}},
                           {"message":{"role":"assistant","content":"other"}}]}"#,
        )
        .unwrap();

        assert_eq!(resp.into_text().unwrap(), "verdict");
    }

    #[test]
    fn empty_or_missing_choices_is_an_error() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(empty.into_text(), Err(AgentError::EmptyChoices)));

        let missing: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(missing.into_text(), Err(AgentError::EmptyChoices)));
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        let result = ChatCompletionResponse::text_from_body("<html>bad gateway</html>");
        assert!(matches!(result, Err(AgentError::JsonError(_))));

        let ok = ChatCompletionResponse::text_from_body(
            r#"{"choices":[{"message":{"role":"assistant","content":"go"}}]}"#,
        );
        assert_eq!(ok.unwrap(), "go");
    }

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        let client = HttpLlmClient::new("http://localhost:11434/v1/", None);
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }
}
