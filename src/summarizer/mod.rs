//! Hosted language model contract and the summary prompt.

use async_trait::async_trait;

pub mod http_api;

pub use http_api::ModelApi;

/// Fixed instruction block prepended to every transcript.
pub const SUMMARY_INSTRUCTIONS: &str = "\
Your task is to review the meeting transcript below. List the key stakeholders, \
highlight the key discussion points, list the decisions that were made, outline \
the action items, and close with a concise narrative summary that includes the \
background needed to understand it.";

/// Prompt sent to the model for one transcript.
pub fn build_summary_prompt(transcript: &str) -> String {
    format!("{} {}", SUMMARY_INSTRUCTIONS, transcript)
}

/// Decoding parameters for summary generation. Temperature stays at
/// zero so a replayed run regenerates the same summary.
#[derive(Debug, Clone)]
pub struct ModelParams {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn invoke(&self, prompt: &str) -> anyhow::Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_transcript_after_instructions() {
        let prompt = build_summary_prompt("0.0 spk_0 Hello world.");
        assert!(prompt.starts_with(SUMMARY_INSTRUCTIONS));
        assert!(prompt.ends_with("0.0 spk_0 Hello world."));
    }
}
