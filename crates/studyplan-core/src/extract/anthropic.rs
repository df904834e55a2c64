//! Task extraction via the Anthropic Messages API.

use indoc::formatdoc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{parse_task_drafts, TaskExtractor};
use crate::error::ExtractError;
use crate::storage::config::ExtractorConfig;
use crate::task::TaskDraft;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicExtractor {
    client: Client,
    api_url: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl AnthropicExtractor {
    pub fn new(api_key: impl Into<String>, config: &ExtractorConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key: api_key.into(),
        }
    }

    /// Read the API key from the environment variable named in `config`.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ExtractError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;
        Ok(Self::new(api_key, config))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: String) -> Result<String, ExtractError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "task extraction request rejected");
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let out: MessagesResponse = resp.json().await?;
        let text: String = out
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        Ok(text)
    }
}

impl TaskExtractor for AnthropicExtractor {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn extract(&self, text: &str) -> Result<Vec<TaskDraft>, ExtractError> {
        debug!(model = %self.model, chars = text.len(), "extracting tasks");
        let reply = self.complete(build_prompt(text)).await?;
        parse_task_drafts(&reply)
    }
}

/// Instructions sent along with the user's description.
pub fn build_prompt(text: &str) -> String {
    formatdoc! {r#"
        You are an expert study planner using the Pomodoro Technique. Analyze the following task description(s) and convert them into a structured JSON array of tasks.

        For each task, you must:
        1. Determine the difficulty (easy/medium/hard) based on complexity and cognitive load
        2. Assess the priority (low/medium/high/urgent) based on deadlines, importance, and dependencies
        3. Estimate the number of pomodoros needed (25-minute work sessions)
        4. Create a clear, concise task name
        5. Provide a brief description
        6. Explain your reasoning for the scheduling order

        User's input:
        {text}

        Return ONLY a valid JSON array of task objects with this exact structure (no markdown, no explanation):
        [
          {{
            "id": "unique_id_1",
            "name": "Task name",
            "estimated_pomodoros": 2,
            "difficulty": "easy|medium|hard",
            "priority": "low|medium|high|urgent",
            "description": "Brief description of what needs to be done",
            "reasoning": "Why this task is scheduled at this position"
          }}
        ]
    "#, text = text}
}
