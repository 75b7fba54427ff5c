//! Chat-completion lookup client
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint; Groq by
//! default.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_nutrition_content, draft_from_value, LookupError, NutritionLookup};
use crate::models::FoodItemDraft;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";

const SYSTEM_PROMPT: &str =
    "You are a nutritional information assistant. Provide nutritional information for foods in JSON format.";
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f64 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<Value>,
}

/// Blocking chat-completion client.
///
/// A fresh `reqwest` client is built per call so the client never outlives
/// the blocking thread it runs on.
#[derive(Debug, Clone)]
pub struct ChatCompletionLookup {
    endpoint: String,
    model: String,
}

impl Default for ChatCompletionLookup {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

impl ChatCompletionLookup {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The JSON request body for a food name
    pub fn request_body(&self, food_name: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(food_name) },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        })
    }
}

fn user_prompt(food_name: &str) -> String {
    format!(
        "Provide nutritional information for {} in JSON format with keys: name (including serving size), \
         calories, protein, fats, carbs. Use grams for protein, fats, and carbs. If unsure, provide estimates \
         and round to nearest whole number. The name should include a common serving size.",
        food_name
    )
}

fn transport(status: Option<u16>, message: impl ToString) -> LookupError {
    LookupError::Transport {
        status,
        message: message.to_string(),
    }
}

/// Pull `choices[0].message.content` out of a response envelope and parse it
pub(crate) fn draft_from_envelope(body: &str) -> Result<FoodItemDraft, LookupError> {
    let envelope: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| transport(None, format!("malformed response envelope: {}", e)))?;

    let content = envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| transport(None, "Unexpected API response structure"))?;

    match content {
        Value::String(text) if !text.trim().is_empty() => parse_nutrition_content(&text),
        Value::Object(_) => draft_from_value(&content),
        _ => Err(transport(None, "Unexpected API response structure")),
    }
}

impl NutritionLookup for ChatCompletionLookup {
    fn lookup(&self, food_name: &str, credential: &str) -> Result<FoodItemDraft, LookupError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(LookupError::Credential);
        }

        tracing::debug!(food = food_name, model = %self.model, "Requesting nutrition lookup");

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| transport(None, e))?;

        let response = client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(&self.request_body(food_name))
            .send()
            .map_err(|e| transport(e.status().map(|s| s.as_u16()), e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Nutrition lookup returned an error status");
            return Err(transport(
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("HTTP error"),
            ));
        }

        let body = response
            .text()
            .map_err(|e| transport(Some(status.as_u16()), e))?;

        let draft = draft_from_envelope(&body)?;
        tracing::info!(food = food_name, name = %draft.name, "Nutrition lookup succeeded");
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credential_fails_without_request() {
        // Unroutable endpoint: reaching the network would surface a transport error
        let lookup = ChatCompletionLookup::new("http://127.0.0.1:9/never", DEFAULT_MODEL);
        let err = lookup.lookup("apple", "   ").unwrap_err();
        assert!(matches!(err, LookupError::Credential));
    }

    #[test]
    fn test_request_body() {
        let body = ChatCompletionLookup::default().request_body("salmon");
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 150);
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("for salmon in JSON format"));
    }

    #[test]
    fn test_envelope_with_text_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant",
            "content": "{\"name\": \"1 egg\", \"calories\": 72, \"protein\": 6, \"fats\": 5, \"carbs\": 0}"}}]}"#;
        let draft = draft_from_envelope(body).unwrap();
        assert_eq!(draft.name, "1 egg");
        assert_eq!(draft.nutrition.fats, 5.0);
    }

    #[test]
    fn test_envelope_with_object_content() {
        let body = r#"{"choices": [{"message": {"content":
            {"name": "1 egg", "calories": 72, "protein": 6, "fats": 5, "carbs": 0}}}]}"#;
        assert_eq!(draft_from_envelope(body).unwrap().nutrition.calories, 72.0);
    }

    #[test]
    fn test_envelope_without_choices() {
        let err = draft_from_envelope(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, LookupError::Transport { status: None, .. }));

        let err = draft_from_envelope("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, LookupError::Transport { .. }));
    }
}
