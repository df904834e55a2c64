//! Free-text to task extraction.
//!
//! The language-model service is an opaque collaborator behind the
//! [`TaskExtractor`] trait: given raw text it yields task drafts or fails with
//! an [`ExtractError`]. Callers import the drafts into a planning session as
//! one batch, so a failure never leaves a half-filled queue behind.

mod anthropic;

pub use anthropic::{build_prompt, AnthropicExtractor};

use std::future::Future;

use crate::error::ExtractError;
use crate::task::{new_task_id, TaskDraft};

/// Turns a free-form description into task drafts.
pub trait TaskExtractor: Send + Sync {
    /// Short identifier used in logs (e.g. "anthropic").
    fn name(&self) -> &str;

    fn extract(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<TaskDraft>, ExtractError>> + Send;
}

/// Parse a model reply into drafts.
///
/// Accepts a bare JSON array or one wrapped in a markdown code fence, and
/// backfills ids on records that lack one.
pub fn parse_task_drafts(reply: &str) -> Result<Vec<TaskDraft>, ExtractError> {
    let json = strip_code_fences(reply);
    if json.is_empty() {
        return Err(ExtractError::Format("empty response".into()));
    }
    let mut drafts: Vec<TaskDraft> = serde_json::from_str(json)?;
    for draft in &mut drafts {
        if draft.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            draft.id = Some(new_task_id());
        }
    }
    Ok(drafts)
}

fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // The closing fence and a language tag may sit on the same line as the body.
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
