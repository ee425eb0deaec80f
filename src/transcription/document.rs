//! Raw transcription result document.
//!
//! The service writes word-level JSON: a full-text transcript, optional
//! diarization metadata, and the ordered token list the formatter
//! re-segments. Field names follow the service's wire format.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDocument {
    pub results: TranscriptResults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptResults {
    #[serde(default)]
    pub transcripts: Vec<Transcript>,
    /// Present only when diarization ran; the formatter refuses to
    /// produce output without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_labels: Option<SpeakerLabels>,
    #[serde(default)]
    pub items: Vec<TranscriptItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub transcript: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerLabels {
    #[serde(default)]
    pub speakers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Pronunciation,
    Punctuation,
}

/// One token: a spoken word (with timing and speaker) or punctuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_label: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    pub content: String,
}

impl TranscriptItem {
    /// Best candidate text for this token.
    pub fn content(&self) -> Option<&str> {
        self.alternatives.first().map(|a| a.content.as_str())
    }

    pub fn spoken(start_time: &str, speaker_label: &str, content: &str) -> Self {
        Self {
            item_type: ItemType::Pronunciation,
            start_time: Some(start_time.to_string()),
            end_time: None,
            speaker_label: Some(speaker_label.to_string()),
            alternatives: vec![Alternative {
                confidence: None,
                content: content.to_string(),
            }],
        }
    }

    pub fn punctuation(content: &str) -> Self {
        Self {
            item_type: ItemType::Punctuation,
            start_time: None,
            end_time: None,
            speaker_label: None,
            alternatives: vec![Alternative {
                confidence: None,
                content: content.to_string(),
            }],
        }
    }
}
