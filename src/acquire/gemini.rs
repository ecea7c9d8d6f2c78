use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::acquire::{Extraction, MetadataSource};
use crate::error::AcquireError;
use crate::models::media::{CitationSource, MediaDescriptor};
use crate::models::settings::AcquireSettings;

/// Structured-generation client. Asks the model for plausible metadata and
/// format listings for a URL; nothing here ever touches the platform itself.
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    deadline: Duration,
}

impl GeminiClient {
    pub fn new(settings: &AcquireSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(settings.deadline())
            .connect_timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            deadline: settings.deadline(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    fn map_transport(&self, err: reqwest::Error) -> AcquireError {
        if err.is_timeout() {
            AcquireError::TimedOut(self.deadline)
        } else {
            AcquireError::Http(err)
        }
    }
}

#[async_trait]
impl MetadataSource for GeminiClient {
    async fn fetch_metadata(&self, url: &str) -> Result<Extraction, AcquireError> {
        tracing::debug!("Gemini: requesting metadata for {}", url);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(url))
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::Status(status));
        }

        let envelope: GenerateResponse =
            response.json().await.map_err(|e| self.map_transport(e))?;

        let text = first_text(&envelope).ok_or(AcquireError::NoPayload)?;
        let descriptor = parse_descriptor(&text)?;
        let sources = extract_sources(&envelope);

        tracing::debug!(
            "Gemini: '{}' resolved with {} formats, {} sources",
            descriptor.title,
            descriptor.formats.len(),
            sources.len()
        );
        Ok(Extraction {
            descriptor,
            sources,
        })
    }
}

fn prompt_for(url: &str) -> String {
    format!(
        "Retrieve the actual title, thumbnail image URL, and duration for this video URL: {url}. \
         If it is a YouTube or Facebook video, find the correct details. \
         Return the response in JSON format following the schema. \
         Provide several realistic simulated download formats (4K, 1080p, 720p, MP3) \
         with estimated file sizes."
    )
}

fn request_body(url: &str) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt_for(url) }] }],
        "tools": [{ "google_search": {} }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING" },
                    "thumbnail": { "type": "STRING" },
                    "duration": { "type": "STRING" },
                    "platform": { "type": "STRING" },
                    "formats": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "quality": { "type": "STRING" },
                                "type": { "type": "STRING", "enum": ["video", "audio"] },
                                "size": { "type": "STRING" },
                                "extension": { "type": "STRING" },
                                "url": { "type": "STRING" }
                            },
                            "required": ["quality", "type", "size", "extension", "url"]
                        }
                    }
                },
                "required": ["title", "thumbnail", "duration", "platform", "formats"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebRef>,
}

#[derive(Debug, Deserialize)]
struct WebRef {
    uri: Option<String>,
    title: Option<String>,
}

fn first_text(envelope: &GenerateResponse) -> Option<String> {
    let parts = &envelope.candidates.first()?.content.as_ref()?.parts;
    let text: String = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_descriptor(text: &str) -> Result<MediaDescriptor, AcquireError> {
    Ok(serde_json::from_str(strip_fences(text))?)
}

/// Models occasionally wrap the JSON payload in a markdown code fence even
/// when asked for raw JSON.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}

/// Citation metadata is decoration: anything missing or malformed degrades
/// to fewer (or zero) sources, never an error.
fn extract_sources(envelope: &GenerateResponse) -> Vec<CitationSource> {
    envelope
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|g| {
            g.grounding_chunks
                .iter()
                .filter_map(|chunk| chunk.web.as_ref())
                .filter_map(|web| {
                    Some(CitationSource {
                        uri: web.uri.clone()?,
                        title: web.title.clone().unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
