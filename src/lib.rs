//! Turns recorded expert calls into transcripts, summaries, and
//! knowledge-base content.
//!
//! A meeting's concatenation pipeline deleting itself means the
//! composited recording is ready; from that event the pipeline
//! transcribes the video, re-segments the transcript by speaker,
//! generates a summary with a language model, and refreshes the
//! knowledge index that serves it.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod global;
pub mod knowledge;
pub mod meeting;
pub mod object_store;
pub mod pipeline;
pub mod summarizer;
pub mod transcription;
