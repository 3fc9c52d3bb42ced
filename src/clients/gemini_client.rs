use reqwest;
use serde::{Deserialize, Serialize};

pub const GEMINI_MODEL: &str = "gemini-3-flash-preview";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
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
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// One generateContent call. `response_mime` requests a structured response
/// (e.g. "application/json"); None leaves the service in plain-text mode.
pub async fn generate_gemini_text(
    prompt: &str,
    response_mime: Option<&str>,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let request = GeminiRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
        generation_config: response_mime.map(|mime| GenerationConfig {
            response_mime_type: mime.to_string(),
        }),
    };

    let client = reqwest::Client::new();
    let response = client
        .post(format!(
            "{}/{}:generateContent",
            GEMINI_ENDPOINT, GEMINI_MODEL
        ))
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?; // read the body once

    if !status.is_success() {
        eprintln!("Error {}: {}", status, text);
        return Err(format!("Request failed with status {}", status).into());
    }

    let parsed: GeminiResponse = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse JSON: {}\nRaw body: {}", e, text))?;

    let body = parsed
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.first())
        .map(|part| part.text.clone());

    match body {
        Some(body) if !body.trim().is_empty() => Ok(body),
        _ => {
            eprintln!("No candidates found in response.\nRaw body:\n{}", text);
            Err("No response from Gemini".to_string().into())
        }
    }
}
