//! Gemini implementation of the analysis provider.
//!
//! Talks to Google's `generateContent` endpoint with a JSON response
//! contract, then normalizes the model's output into timeline-ready
//! values. Anything that does not satisfy the contract (unparseable JSON,
//! events without names, timestamps that are negative or unreadable) is a
//! hard `MalformedResponse` failure rather than a best-effort repair.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use wlens_models::{
    parse_timestamp, AnswerReference, QuestionAnswer, VideoAnalysis, VideoEvent, VideoId,
};

use crate::error::{AnalysisError, AnalysisResult};
use crate::provider::{AnalysisProvider, QuestionRequest, VideoAnalysisRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (`GEMINI_API_KEY`)
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// API base URL, overridable for tests
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read configuration from the environment.
    pub fn from_env() -> AnalysisResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AnalysisError::config("GEMINI_API_KEY environment variable not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("WLENS_GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(temperature) = std::env::var("WLENS_GEMINI_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.temperature = temperature;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Gemini API client.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

/// Gemini API request body.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    temperature: f32,
}

/// Gemini API response body.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// Analysis payload embedded in the model's reply.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    events: Vec<RawEvent>,
    summary: String,
    #[serde(rename = "keyPoints", default)]
    key_points: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    name: String,
    #[serde(default)]
    description: String,
    timestamp: RawTimestamp,
}

/// Timestamp as the model returns it: seconds or a clock string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(f64),
    Clock(String),
}

/// Answer payload embedded in the model's reply.
#[derive(Debug, Deserialize)]
struct RawAnswer {
    answer: String,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a provider from environment variables.
    pub fn from_env() -> AnalysisResult<Self> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Call `generateContent` and return the first candidate's text with
    /// markdown fences stripped.
    async fn call_generate(&self, prompt: String) -> AnalysisResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: self.config.temperature,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::api(status.as_u16(), body));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::malformed(format!("Failed to parse response envelope: {}", e)))?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| AnalysisError::malformed("Response contained no candidates"))?;

        Ok(strip_markdown_fences(text).trim().to_string())
    }
}

fn build_analysis_prompt(request: &VideoAnalysisRequest) -> String {
    let mut context = String::new();
    if let Some(title) = &request.title {
        context.push_str(&format!("Video title: {}\n", title));
    }
    if let Some(description) = &request.description {
        context.push_str(&format!("Video description: {}\n", description));
    }

    format!(
        r#"You are analyzing a YouTube video transcript. Each transcript line is prefixed with its start time as [HH:MM:SS].

{context}Identify the distinct segments of the video and respond with JSON only, exactly in this shape:

{{
  "events": [
    {{"name": "short segment name", "description": "one sentence on what happens", "timestamp": <start time in seconds>}}
  ],
  "summary": "2-3 sentence summary of the whole video",
  "keyPoints": ["the main takeaways as short strings"]
}}

Rules:
- timestamp is the segment start in seconds from the beginning of the video, taken from the transcript timing
- every event needs a non-empty name
- order does not matter, but timestamps must not be negative
- 5 to 12 events for a typical video

Transcript:
{transcript}"#,
        context = context,
        transcript = request.transcript,
    )
}

fn build_question_prompt(request: &QuestionRequest) -> String {
    let mut context = String::new();
    if let Some(title) = &request.title {
        context.push_str(&format!("Video title: {}\n", title));
    }

    format!(
        r#"You are answering a question about a YouTube video using its transcript. Each transcript line is prefixed with its start time as [HH:MM:SS].

{context}Respond with JSON only, exactly in this shape:

{{"answer": "your answer"}}

When the answer draws on a specific moment, cite it inline as a markdown link whose target is the time in seconds, e.g. "the demo starts at [the live demo](372)".

Question: {question}

Transcript:
{transcript}"#,
        context = context,
        question = request.question,
        transcript = request.transcript,
    )
}

/// Strip a ```json ... ``` (or plain ```) wrapper the model sometimes adds
/// despite the JSON response mime type.
fn strip_markdown_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text)
}

fn parse_analysis_payload(
    video_id: &VideoId,
    model: &str,
    text: &str,
) -> AnalysisResult<VideoAnalysis> {
    let raw: RawAnalysis = serde_json::from_str(text)
        .map_err(|e| AnalysisError::malformed(format!("Failed to parse analysis JSON: {}", e)))?;

    if raw.summary.trim().is_empty() {
        return Err(AnalysisError::malformed("Analysis summary is empty"));
    }

    let mut events = Vec::with_capacity(raw.events.len());
    for (index, raw_event) in raw.events.into_iter().enumerate() {
        events.push(normalize_event(index, raw_event)?);
    }

    Ok(VideoAnalysis::new(
        video_id.clone(),
        raw.summary,
        raw.key_points,
        events,
        model,
    ))
}

fn normalize_event(index: usize, raw: RawEvent) -> AnalysisResult<VideoEvent> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(AnalysisError::malformed(format!(
            "Event {} has an empty name",
            index
        )));
    }

    let timestamp = match raw.timestamp {
        RawTimestamp::Seconds(seconds) => seconds,
        RawTimestamp::Clock(clock) => parse_timestamp(&clock).map_err(|e| {
            AnalysisError::malformed(format!("Event {} timestamp: {}", index, e))
        })?,
    };

    if !timestamp.is_finite() || timestamp < 0.0 {
        return Err(AnalysisError::malformed(format!(
            "Event {} timestamp {} is out of range",
            index, timestamp
        )));
    }

    Ok(VideoEvent::new(name, raw.description.trim(), timestamp))
}

/// Extract `[label](seconds)` references from an answer.
pub fn parse_answer_references(answer: &str) -> Vec<AnswerReference> {
    let pattern = Regex::new(r"\[([^\]]+)\]\((\d+(?:\.\d+)?)\)").unwrap();
    pattern
        .captures_iter(answer)
        .filter_map(|caps| {
            let seconds: f64 = caps[2].parse().ok()?;
            Some(AnswerReference {
                label: caps[1].to_string(),
                seconds,
            })
        })
        .collect()
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    async fn analyze_video(&self, request: &VideoAnalysisRequest) -> AnalysisResult<VideoAnalysis> {
        if request.transcript.trim().is_empty() {
            return Err(AnalysisError::EmptyTranscript);
        }

        let request_id = Uuid::new_v4();
        info!(
            request_id = %request_id,
            video_id = %request.video_id,
            model = %self.config.model,
            transcript_chars = request.transcript.len(),
            "Requesting video analysis"
        );

        let prompt = build_analysis_prompt(request);
        let text = self.call_generate(prompt).await?;
        let analysis = parse_analysis_payload(&request.video_id, &self.config.model, &text)?;

        info!(
            request_id = %request_id,
            events = analysis.events.len(),
            key_points = analysis.key_points.len(),
            "Analysis complete"
        );
        Ok(analysis)
    }

    async fn answer_question(&self, request: &QuestionRequest) -> AnalysisResult<QuestionAnswer> {
        if request.transcript.trim().is_empty() {
            return Err(AnalysisError::EmptyTranscript);
        }

        let request_id = Uuid::new_v4();
        info!(
            request_id = %request_id,
            video_id = %request.video_id,
            model = %self.config.model,
            "Requesting answer"
        );

        let prompt = build_question_prompt(request);
        let text = self.call_generate(prompt).await?;

        let raw: RawAnswer = serde_json::from_str(&text)
            .map_err(|e| AnalysisError::malformed(format!("Failed to parse answer JSON: {}", e)))?;
        if raw.answer.trim().is_empty() {
            return Err(AnalysisError::malformed("Answer is empty"));
        }

        let references = parse_answer_references(&raw.answer);
        debug!(request_id = %request_id, references = references.len(), "Answer complete");

        Ok(QuestionAnswer::new(
            request.video_id.clone(),
            request.question.clone(),
            raw.answer,
            references,
            &self.config.model,
        ))
    }
}
