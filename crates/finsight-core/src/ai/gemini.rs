//! Gemini backend implementation
//!
//! Talks to the hosted Google Generative Language API
//! (`models/<model>:generateContent`). Documents travel as inline base64
//! parts; structured output is pinned with a response schema and
//! `responseMimeType: application/json`. Both operations disable extended
//! reasoning (`thinkingBudget: 0`) since extraction and advice are simple
//! one-shot generations where latency matters more.
//!
//! # Configuration
//!
//! Environment variables:
//! - `GEMINI_API_KEY`: API credential (required)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.5-flash)
//! - `GEMINI_HOST`: Base URL override, used by tests against a mock server

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::intake::UploadedDocument;
use crate::models::FinancialAdvice;
use crate::prompts::{PromptId, PromptLibrary};

use super::parsing::{parse_advice, parse_transactions};
use super::types::ExtractedTransaction;
use super::AIBackend;

/// Default public API host
const DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";

/// Default model
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini backend
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl Clone for GeminiBackend {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            prompts: self.prompts.clone(),
        }
    }
}

impl GeminiBackend {
    /// Create a new Gemini backend against the public API host
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_host(DEFAULT_HOST, api_key, model)
    }

    /// Create a backend against a custom host (mock server in tests)
    pub fn with_host(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
            api_key: self.api_key.clone(),
            prompts: self.prompts.clone(),
        }
    }

    /// Create from environment variables
    ///
    /// Required: `GEMINI_API_KEY`
    /// Optional: `GEMINI_MODEL` (default: gemini-2.5-flash), `GEMINI_HOST`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        Some(Self::with_host(&host, &api_key, &model))
    }

    /// Make a generateContent request, returning the response text if any
    async fn generate_content(
        &self,
        parts: Vec<Part>,
        response_schema: serde_json::Value,
    ) -> Result<Option<String>> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                // No extended reasoning for these simple one-shot tasks
                thinking_config: ThinkingConfig { thinking_budget: 0 },
                response_mime_type: "application/json".to_string(),
                response_schema,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let content: GenerateContentResponse = response.json().await?;

        Ok(content.text())
    }
}

/// generateContent request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

/// A content entry (one user turn)
#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

/// Content part (inline document bytes or text)
#[derive(Debug, Serialize)]
enum Part {
    #[serde(rename = "inline_data")]
    InlineData { mime_type: String, data: String },
    #[serde(rename = "text")]
    Text(String),
}

/// Generation configuration
#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "thinkingConfig")]
    thinking_config: ThinkingConfig,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Thinking budget configuration
#[derive(Debug, Serialize)]
struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    thinking_budget: u32,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join(""))
        }
    }
}

/// Response schema for transaction extraction (array of objects)
fn extraction_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "date": { "type": "STRING", "description": "YYYY-MM-DD" },
                "merchant": { "type": "STRING" },
                "amount": { "type": "NUMBER" },
                "category": { "type": "STRING" },
                "type": { "type": "STRING", "enum": ["INCOME", "EXPENSE"] },
                "description": { "type": "STRING" }
            },
            "required": ["date", "merchant", "amount", "category", "type"]
        }
    })
}

/// Response schema for advice generation (single object)
fn advice_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "actionableTips": { "type": "ARRAY", "items": { "type": "STRING" } },
            "savingsPotential": { "type": "NUMBER" }
        },
        "required": ["summary", "actionableTips", "savingsPotential"]
    })
}

#[async_trait]
impl AIBackend for GeminiBackend {
    async fn extract_transactions(
        &self,
        document: &UploadedDocument,
    ) -> Result<Vec<ExtractedTransaction>> {
        let prompt = {
            let mut prompts = self
                .prompts
                .write()
                .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
            let template = prompts.get(PromptId::ExtractTransactions)?;
            template.render_user(&HashMap::new())
        };

        let parts = vec![
            Part::InlineData {
                mime_type: document.mime_type.clone(),
                data: document.clean_base64().to_string(),
            },
            Part::Text(prompt),
        ];

        match self.generate_content(parts, extraction_schema()).await? {
            Some(text) => {
                debug!("Gemini extraction response: {}", text);
                parse_transactions(&text)
            }
            // No response text means no transactions, not a failure
            None => Ok(Vec::new()),
        }
    }

    async fn generate_advice(&self, summary: &str) -> Result<FinancialAdvice> {
        let prompt = {
            let mut prompts = self
                .prompts
                .write()
                .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
            let template = prompts.get(PromptId::FinancialAdvice)?;
            let mut vars = HashMap::new();
            vars.insert("summary_data", summary);
            template.render_user(&vars)
        };

        match self
            .generate_content(vec![Part::Text(prompt)], advice_schema())
            .await?
        {
            Some(text) => {
                debug!("Gemini advice response: {}", text);
                parse_advice(&text)
            }
            None => Err(Error::InvalidData(
                "No response text from advice generation".into(),
            )),
        }
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1beta/models", self.base_url);
        match self
            .http_client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
