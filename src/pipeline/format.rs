//! Speaker-turn transcript formatting.
//!
//! Re-segments the word-level transcription result into one line per
//! speaker turn, `{start_time} {speaker} {words...}`, with a blank line
//! between turns. The formatted text is what the summarizer reads.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::object_store::parse_object_uri;
use crate::transcription::document::{ItemType, TranscriptDocument};
use crate::transcription::TranscriptionJob;

use super::prepare::JobDescriptor;
use super::SummaryPipeline;

/// Where the formatted transcript was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResult {
    pub bucket_name: String,
    pub speaker_transcription_key_name: String,
}

/// Collapse word-level items into speaker-turn lines.
///
/// Consecutive words from the same speaker stay on one line; a change
/// of speaker starts a new line stamped with the word's start time.
/// Punctuation attaches to the open line without a leading space.
pub fn format_speaker_transcript(document: &TranscriptDocument) -> Result<String> {
    if document.results.speaker_labels.is_none() {
        bail!("Transcript has no speaker labels; the job must run with speaker identification enabled");
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current_speaker: Option<&str> = None;
    let mut line = String::new();

    for item in &document.results.items {
        let Some(content) = item.content() else {
            continue;
        };

        if let (Some(speaker), Some(start)) = (&item.speaker_label, &item.start_time) {
            if current_speaker == Some(speaker.as_str()) {
                line.push(' ');
                line.push_str(content);
            } else {
                if !line.is_empty() {
                    lines.push(line);
                }
                current_speaker = Some(speaker.as_str());
                line = format!("{start} {speaker} {content}");
            }
        } else if item.item_type == ItemType::Punctuation && !line.is_empty() {
            line.push_str(content);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    Ok(lines.join("\n\n"))
}

impl SummaryPipeline {
    /// Download a completed job's transcript, format it, and store the
    /// speaker-turn text next to the raw result.
    pub async fn format_transcription(
        &self,
        job: &TranscriptionJob,
        descriptor: &JobDescriptor,
    ) -> Result<FormatResult> {
        let uri = job
            .transcript_file_uri
            .as_deref()
            .context("Transcription job completed without a transcript file URI")?;
        let (bucket, key) = parse_object_uri(uri)
            .with_context(|| format!("Unrecognized transcript file URI {uri}"))?;

        let raw = self
            .objects
            .get_object(&bucket, &key)
            .await
            .with_context(|| format!("Failed to download transcript {bucket}/{key}"))?;
        let document: TranscriptDocument =
            serde_json::from_slice(&raw).context("Failed to parse transcript document")?;

        let formatted = format_speaker_transcript(&document)?;

        let output_key = format!(
            "{}/{}-speaker-transcription.txt",
            descriptor.meeting_id, descriptor.source_file_name
        );
        self.objects
            .put_object(&bucket, &output_key, formatted.into_bytes(), "text/plain")
            .await
            .with_context(|| {
                format!("Failed to upload speaker transcript {bucket}/{output_key}")
            })?;

        info!(
            meeting_id = %descriptor.meeting_id,
            key = %output_key,
            "Speaker transcript written"
        );

        Ok(FormatResult {
            bucket_name: bucket,
            speaker_transcription_key_name: output_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::document::{SpeakerLabels, TranscriptItem, TranscriptResults};

    fn document(items: Vec<TranscriptItem>) -> TranscriptDocument {
        TranscriptDocument {
            results: TranscriptResults {
                transcripts: Vec::new(),
                speaker_labels: Some(SpeakerLabels { speakers: 2 }),
                items,
            },
        }
    }

    #[test]
    fn test_groups_consecutive_words_by_speaker() {
        let doc = document(vec![
            TranscriptItem::spoken("0.0", "spk_0", "Hello"),
            TranscriptItem::spoken("0.5", "spk_0", "world"),
            TranscriptItem::punctuation("."),
            TranscriptItem::spoken("1.2", "spk_1", "Hi"),
        ]);

        let text = format_speaker_transcript(&doc).unwrap();
        assert_eq!(text, "0.0 spk_0 Hello world.\n\n1.2 spk_1 Hi");
    }

    #[test]
    fn test_same_speaker_stays_on_one_line() {
        let doc = document(vec![
            TranscriptItem::spoken("0.0", "spk_0", "One"),
            TranscriptItem::spoken("0.4", "spk_0", "two"),
            TranscriptItem::spoken("0.9", "spk_0", "three"),
        ]);

        let text = format_speaker_transcript(&doc).unwrap();
        assert_eq!(text, "0.0 spk_0 One two three");
    }

    #[test]
    fn test_speaker_reappearing_starts_a_new_line() {
        let doc = document(vec![
            TranscriptItem::spoken("0.0", "spk_0", "First"),
            TranscriptItem::spoken("1.0", "spk_1", "Second"),
            TranscriptItem::spoken("2.0", "spk_0", "Third"),
        ]);

        let text = format_speaker_transcript(&doc).unwrap();
        assert_eq!(
            text,
            "0.0 spk_0 First\n\n1.0 spk_1 Second\n\n2.0 spk_0 Third"
        );
    }

    #[test]
    fn test_punctuation_attaches_without_space() {
        let doc = document(vec![
            TranscriptItem::spoken("0.0", "spk_0", "Right"),
            TranscriptItem::punctuation(","),
            TranscriptItem::spoken("0.6", "spk_0", "onwards"),
            TranscriptItem::punctuation("."),
        ]);

        let text = format_speaker_transcript(&doc).unwrap();
        assert_eq!(text, "0.0 spk_0 Right, onwards.");
    }

    #[test]
    fn test_leading_punctuation_is_dropped() {
        let doc = document(vec![
            TranscriptItem::punctuation("."),
            TranscriptItem::spoken("0.3", "spk_0", "Start"),
        ]);

        let text = format_speaker_transcript(&doc).unwrap();
        assert_eq!(text, "0.3 spk_0 Start");
    }

    #[test]
    fn test_empty_item_list_formats_to_empty_text() {
        let doc = document(Vec::new());
        assert_eq!(format_speaker_transcript(&doc).unwrap(), "");
    }

    #[test]
    fn test_missing_speaker_labels_is_an_error() {
        let doc = TranscriptDocument {
            results: TranscriptResults {
                transcripts: Vec::new(),
                speaker_labels: None,
                items: vec![TranscriptItem::spoken("0.0", "spk_0", "Hello")],
            },
        };

        assert!(format_speaker_transcript(&doc).is_err());
    }

    #[test]
    fn test_format_result_wire_names() {
        let result = FormatResult {
            bucket_name: "transcriptions".to_string(),
            speaker_transcription_key_name: "m-1/p-1.mp4-speaker-transcription.txt".to_string(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["bucketName"], "transcriptions");
        assert_eq!(
            value["speakerTranscriptionKeyName"],
            "m-1/p-1.mp4-speaker-transcription.txt"
        );
    }
}
