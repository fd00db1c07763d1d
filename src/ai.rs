use std::process::Command;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{AiBackend, AiConfig};
use crate::error::{Result, TagscoutError};

/// Maximum number of ranked tags sent to the generator
pub const MAX_PROMPT_TAGS: usize = 10;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const FALLBACK_TITLE: &str = "Error generating title";
const FALLBACK_INSIGHT: &str = "Could not connect to AI service.";

/// Suggested metadata for a niche, produced from its top tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIAnalysis {
    pub suggested_title: String,
    pub additional_tags: Vec<String>,
    pub niche_insight: String,
}

impl AIAnalysis {
    /// Result returned whenever generation fails
    pub fn fallback() -> Self {
        Self {
            suggested_title: FALLBACK_TITLE.to_string(),
            additional_tags: Vec::new(),
            niche_insight: FALLBACK_INSIGHT.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.suggested_title == FALLBACK_TITLE && self.additional_tags.is_empty()
    }
}

/// A text-generation service that answers a prompt with raw text
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the generator selected in the configuration
pub fn generator_for(config: &AiConfig) -> Box<dyn TextGenerator> {
    match config.backend {
        AiBackend::Gemini => Box::new(GeminiGenerator::new(config)),
        AiBackend::Claude => Box::new(ClaudeCliGenerator),
    }
}

const PROMPT_TEMPLATE: &str = r#"Act as an expert Microstock contributor. I have a list of top-performing keywords from a niche: {{tags}}.
Based on these, generate:
1. A high-converting title (max 200 chars).
2. 10 additional relevant high-demand tags not in the list.
3. A short niche insight for contributors.

Respond ONLY with JSON, no other text:
{"suggestedTitle": "...", "additionalTags": ["..."], "nicheInsight": "..."}"#;

/// Build the instruction prompt for up to [`MAX_PROMPT_TAGS`] tags
pub fn build_prompt(tags: &[String]) -> String {
    let listed = tags
        .iter()
        .take(MAX_PROMPT_TAGS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    PROMPT_TEMPLATE.replace("{{tags}}", &listed)
}

/// Ask the generator for title, tag and insight suggestions
///
/// Never fails: any generator or parse error degrades to
/// [`AIAnalysis::fallback`].
pub fn suggest(generator: &dyn TextGenerator, top_tags: &[String]) -> AIAnalysis {
    let prompt = build_prompt(top_tags);
    match generator.generate(&prompt).and_then(|text| parse_analysis(&text)) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(error = %e, "AI analysis failed, using fallback");
            AIAnalysis::fallback()
        }
    }
}

/// Parse a generator response body into an analysis
pub fn parse_analysis(text: &str) -> Result<AIAnalysis> {
    let json_text = strip_code_fencing(text);
    let analysis: AIAnalysis = serde_json::from_str(&json_text)?;
    if analysis.suggested_title.trim().is_empty() || analysis.niche_insight.trim().is_empty() {
        return Err(TagscoutError::GenerationError(
            "response has an empty title or insight".into(),
        ));
    }
    Ok(analysis)
}

/// Strip markdown code fencing from a string (e.g., ```json ... ```)
/// Also handles cases where there's text before the code block
fn strip_code_fencing(s: &str) -> String {
    let trimmed = s.trim();

    if let Some(json_start) = trimmed.find("```json") {
        let after_fence = &trimmed[json_start + 7..];
        if let Some(end_fence) = after_fence.find("```") {
            return after_fence[..end_fence].trim().to_string();
        }
        return after_fence.trim().to_string();
    }

    if let Some(code_start) = trimmed.find("```\n") {
        let after_fence = &trimmed[code_start + 4..];
        if let Some(end_fence) = after_fence.find("```") {
            return after_fence[..end_fence].trim().to_string();
        }
        return after_fence.trim().to_string();
    }

    trimmed.to_string()
}

/// Google Generative Language API client
pub struct GeminiGenerator {
    agent: ureq::Agent,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiGenerator {
    pub fn new(config: &AiConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self {
            agent,
            model: config.model.clone(),
            api_key: config.api_key(),
            api_key_env: config.api_key_env.clone(),
        }
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "suggestedTitle": { "type": "STRING" },
                        "additionalTags": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "nicheInsight": { "type": "STRING" }
                    },
                    "required": ["suggestedTitle", "additionalTags", "nicheInsight"]
                }
            }
        })
    }
}

impl TextGenerator for GeminiGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            TagscoutError::GenerationError(format!("{} is not set", self.api_key_env))
        })?;

        let url = format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.model);
        tracing::debug!(model = %self.model, "requesting Gemini generation");

        let response: GenerateResponse = self
            .agent
            .post(url.as_str())
            .header("x-goog-api-key", api_key)
            .send_json(Self::request_body(prompt))?
            .into_body()
            .read_json()?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| TagscoutError::GenerationError("no candidate text in response".into()))
    }
}

/// Claude CLI subprocess backend
pub struct ClaudeCliGenerator;

impl TextGenerator for ClaudeCliGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let system_prompt = "You are a microstock metadata assistant. Respond only with valid JSON matching the schema provided. Do not include any text before or after the JSON.";

        let output = Command::new("claude")
            .args([
                "-p",
                "--output-format", "json",
                "--max-turns", "1",
                "--system-prompt", system_prompt,
                prompt,
            ])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TagscoutError::ClaudeFailed(stderr.to_string()));
        }

        // Claude's JSON output wraps the actual response in "result"
        let stdout = String::from_utf8_lossy(&output.stdout);
        let wrapper: serde_json::Value = serde_json::from_str(&stdout)?;
        wrapper["result"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| TagscoutError::ClaudeFailed("No result in response".into()))
    }
}
