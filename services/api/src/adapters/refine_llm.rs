//! services/api/src/adapters/refine_llm.rs
//!
//! This module contains the adapter for the idea-refining LLM.
//! It implements the `IdeaRefinementService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat},
    Client,
};
use async_trait::async_trait;
use launchpad_core::{
    domain::RefinedIdea,
    ports::{IdeaRefinementService, PortError, PortResult},
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `IdeaRefinementService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiRefineAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiRefineAdapter {
    /// Creates a new `OpenAiRefineAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Builds the single user message sent to the model.
fn refinement_prompt(idea: &str) -> String {
    format!(
        r#"Given this startup idea: "{idea}"

Provide a very simple problem statement and target audience. Be extremely concise.
Format your response as a JSON object with these keys:
{{
  "problem_statement": "One short, simple sentence",
  "target_audience": "2-4 words only"
}}

Example:
Input: "dating site for introverts"
Output: {{
  "problem_statement": "Introverts find it hard to date on regular dating platforms",
  "target_audience": "Introverted singles"
}}"#
    )
}

/// Reads the model's JSON object into a `RefinedIdea`.
fn parse_refinement(content: &str) -> PortResult<RefinedIdea> {
    serde_json::from_str(content).map_err(|e| {
        PortError::Unexpected(format!("Refinement LLM returned malformed JSON: {}", e))
    })
}

//=========================================================================================
// `IdeaRefinementService` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdeaRefinementService for OpenAiRefineAdapter {
    async fn refine_idea(&self, idea: &str) -> PortResult<RefinedIdea> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(refinement_prompt(idea))
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unavailable(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Refinement LLM response contained no text content.".to_string(),
                )
            })?;

        parse_refinement(&content)
    }
}
