//! The [`TextGenerator`] seam and an OpenAI-compatible implementation.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{GenerationError, Result};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// A fallible single-shot text completion.
pub trait TextGenerator: Send + Sync {
  fn complete<'a>(
    &'a self,
    system_prompt: &'a str,
    user_prompt: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

/// An absent generator always fails with [`GenerationError::Disabled`].
impl<G: TextGenerator> TextGenerator for Option<G> {
  async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
    match self {
      Some(generator) => generator.complete(system_prompt, user_prompt).await,
      None => Err(GenerationError::Disabled),
    }
  }
}

// ─── OpenAI chat completions ─────────────────────────────────────────────────

/// Connection settings for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
  pub api_key:  String,
  pub model:    String,
  /// Base URL up to and including the version segment, e.g.
  /// `https://api.openai.com/v1`.
  pub base_url: String,
  /// Client-side limit on a whole request.
  pub timeout:  Duration,
}

/// Calls `POST {base_url}/chat/completions`.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenAiGenerator {
  client: Client,
  config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:    &'a str,
  messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
  content: Option<String>,
}

impl OpenAiGenerator {
  pub fn new(config: OpenAiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

impl TextGenerator for OpenAiGenerator {
  async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
    let request = ChatRequest {
      model:    &self.config.model,
      messages: [
        ChatMessage { role: "system", content: system_prompt },
        ChatMessage { role: "user", content: user_prompt },
      ],
    };

    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.config.api_key)
      .json(&request)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(GenerationError::Status { status: status.as_u16(), body });
    }

    let parsed: ChatResponse = resp.json().await?;
    parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .map(|text| text.trim().to_owned())
      .filter(|text| !text.is_empty())
      .ok_or(GenerationError::EmptyResponse)
  }
}
