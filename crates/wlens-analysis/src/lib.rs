//! Analysis provider layer for WatchLens.
//!
//! Defines the provider seam (`AnalysisProvider`) the engine calls to turn
//! a transcript into timed events, summaries, and answers, plus the Gemini
//! implementation of that seam.

pub mod error;
pub mod gemini;
pub mod provider;

pub use error::{AnalysisError, AnalysisResult};
pub use gemini::{parse_answer_references, GeminiConfig, GeminiProvider};
pub use provider::{AnalysisProvider, QuestionRequest, VideoAnalysisRequest};
