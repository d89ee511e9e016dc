//! Decoding of the recognizer's chat-completions response body.
//!
//! Only the response envelope is handled here; building and sending the
//! request belongs to the caller.

use serde::Deserialize;
use tracing::debug;

use crate::error::UpstreamError;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    fn is_authentication(&self) -> bool {
        let code = self.code.as_ref().and_then(|c| c.as_str()).unwrap_or("");
        let kind = self.kind.as_deref().unwrap_or("");

        code == "invalid_api_key" || kind == "authentication_error"
    }
}

impl From<ApiErrorBody> for UpstreamError {
    fn from(body: ApiErrorBody) -> Self {
        let authentication = body.is_authentication();
        let message = body
            .message
            .unwrap_or_else(|| "recognizer API error".to_string());

        if authentication {
            UpstreamError::Authentication(message)
        } else {
            UpstreamError::Api(message)
        }
    }
}

/// Pull `choices[0].message.content` out of a completion response body.
///
/// An `error` object in the body, a missing message, or blank content are
/// all reported as [`UpstreamError`]s so they can be fed to
/// [`PriceTagParser::parse_upstream`](crate::PriceTagParser::parse_upstream).
pub fn content_from_completion(body: &str) -> Result<String, UpstreamError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(error.into());
    }

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(UpstreamError::EmptyResponse);
    }

    debug!("Completion content has {} characters", content.len());
    Ok(content)
}
