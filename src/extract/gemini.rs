//! Extraction through the Gemini `generateContent` API.

use std::time::Duration;

use jiff::Zoned;
use serde::Deserialize;
use tracing::debug;

use super::{ExtractError, Extraction, Extractor, decode_extraction};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Calls Gemini once per input. No retries.
pub struct GeminiExtractor {
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

impl GeminiExtractor {
    /// Builds an extractor from a resolved key, failing if there is none.
    pub fn with_key(api_key: Option<String>, model: &str) -> Result<Self, ExtractError> {
        let api_key = api_key.ok_or(ExtractError::MissingApiKey)?;
        Ok(Self::new(api_key, model))
    }

    pub fn new(api_key: String, model: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(TIMEOUT).build();
        Self {
            api_key,
            model: model.to_string(),
            agent,
        }
    }

    /// The request URL. The key travels in a header so transport errors,
    /// which quote the URL, never print it.
    fn endpoint(&self) -> String {
        format!("{BASE_URL}/{}:generateContent", self.model)
    }

    fn generate(&self, prompt: &str) -> Result<String, ExtractError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.1,
                "maxOutputTokens": 500,
                "responseMimeType": "application/json",
            },
        });

        let resp = self
            .agent
            .post(&self.endpoint())
            .set("Content-Type", "application/json")
            .set("x-goog-api-key", &self.api_key)
            .send_string(&body.to_string())
            .map_err(|e| match e {
                ureq::Error::Status(status, resp) => ExtractError::Api {
                    status,
                    body: resp.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(t) => ExtractError::Transport(t.to_string()),
            })?;

        let text = resp
            .into_string()
            .map_err(|e| ExtractError::Transport(e.to_string()))?;
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| ExtractError::Transport(format!("failed to decode response: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(ExtractError::EmptyResponse)
    }
}

impl Extractor for GeminiExtractor {
    fn extract(&self, input: &str, now: &Zoned) -> Result<Extraction, ExtractError> {
        let prompt = build_prompt(input, now);
        let reply = self.generate(&prompt)?;
        debug!(model = %self.model, bytes = reply.len(), "gemini replied");
        decode_extraction(input, strip_to_json(&reply).as_bytes())
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Strips markdown fences and any prose around the outermost JSON object.
fn strip_to_json(reply: &str) -> &str {
    let mut s = reply.trim();
    if let Some(rest) = s.strip_prefix("```json").or_else(|| s.strip_prefix("```")) {
        s = rest.strip_suffix("```").unwrap_or(rest).trim();
    }
    match (s.find('{'), s.rfind('}')) {
        (Some(start), Some(end)) if end > start => &s[start..=end],
        _ => s,
    }
}

fn build_prompt(input: &str, now: &Zoned) -> String {
    format!(
        r#"You are a structured data extraction assistant for a personal task management system. Extract information from the user's natural language input and return ONLY valid JSON.

Today is {today} ({weekday}).

Input: "{input}"

Return a JSON object with this exact structure:
{{
  "type": "log" | "progress" | "commitment" | "update" | "event" | "correction",
  "confidence": 0.0-1.0,
  "data": {{
    // Fields depend on type:
    // - commitment: {{ "person": string, "project": string (optional), "expectation": {{ "description": string, "deadline": "YYYY-MM-DD", "hardness": "hard"|"soft" }} }}
    // - progress: {{ "project": string, "status": string (optional), "notes": string (optional) }}
    // - update: {{ "commitment_id": string (optional), "person": string (optional), "project": string (optional), "status": string }}
    // - event: {{ "time": "YYYY-MM-DD HH:MM" or "YYYY-MM-DD", "person": string (optional), "project": string (optional), "title": string }}
    // - log: {{ "text": string }}
    // - correction: {{ "text": string }}
  }},
  "questions": [] // Array of {{ "id", "text", "required", "field" }} if information is missing/ambiguous
}}

Guidelines:
- If it's a commitment (told someone, promised, will do, said I'll), use type "commitment"
- If it's progress update (done, finished, completed, made progress), use type "progress" or "update"
- If it's scheduling (meet, call, event, appointment), use type "event"
- If it's a correction (that's wrong, actually, correction), use type "correction"
- Otherwise, use type "log"
- Extract dates relative to today (tomorrow = today + 1 day, next week = today + 7 days)
- Be confident (>= 0.7) if you're sure, lower if uncertain
- Include questions if key info is missing (e.g., missing person, deadline, project)
- For commitments, infer project from context if mentioned (caresad, farmer, kaifu, soldecoder, etc.)

Return ONLY the JSON object, no other text."#,
        today = now.date(),
        weekday = now.strftime("%A"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::{civil::date, tz::TimeZone};

    #[test]
    fn missing_key_is_an_error() {
        let err = GeminiExtractor::with_key(None, DEFAULT_MODEL).err().unwrap();
        assert!(matches!(err, ExtractError::MissingApiKey));
    }

    #[test]
    fn endpoint_carries_no_key() {
        let gemini = GeminiExtractor::new("secret-key".into(), DEFAULT_MODEL);
        let url = gemini.endpoint();
        assert!(url.ends_with("/gemini-2.5-flash:generateContent"));
        assert!(!url.contains("secret-key"));
    }

    #[test]
    fn strips_json_fence() {
        let reply = "```json\n{\"type\":\"log\"}\n```";
        assert_eq!(strip_to_json(reply), "{\"type\":\"log\"}");
    }

    #[test]
    fn strips_bare_fence_and_prose() {
        let reply = "```\nHere you go: {\"type\":\"log\"} hope that helps\n```";
        assert_eq!(strip_to_json(reply), "{\"type\":\"log\"}");
    }

    #[test]
    fn leaves_non_json_alone() {
        assert_eq!(strip_to_json("  sorry, no  "), "sorry, no");
    }

    #[test]
    fn prompt_carries_date_and_input() {
        let now = date(2024, 3, 8)
            .at(9, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap();
        let prompt = build_prompt("call bob tomorrow", &now);
        assert!(prompt.contains("Today is 2024-03-08 (Friday)."));
        assert!(prompt.contains("Input: \"call bob tomorrow\""));
    }

    #[test]
    fn decodes_response_envelope() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{}"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "{}");
    }
}
