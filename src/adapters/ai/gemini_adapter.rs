//! Gemini / Imagen adapter for post and image generation.
//!
//! Implements `AiPort` over the Generative Language REST API:
//! - text calls use `generateContent` with a JSON response schema
//! - the high-quality image model uses Imagen `predict`
//! - the fast/editing image model uses `generateContent` with inline image data (logo overlay)

use crate::domain::{
    AspectRatio, DomainError, GenerationResult, Goal, ImageModel, ImageRequest, LogoPosition,
};
use crate::ports::AiPort;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    text_model: String,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter.
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "https://generativelanguage.googleapis.com/v1beta")
    /// * `api_key` - Gemini API key
    /// * `text_model` - Model for posts, refinement and ideas (e.g., "gemini-2.5-flash")
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: String,
        api_key: String,
        text_model: String,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model,
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    fn posts_system_prompt() -> &'static str {
        r#"You are a senior social-media copywriter for Arabic-speaking audiences.
Write in natural Egyptian Arabic unless the idea is written in another dialect or language.

## Your Task
1. Write exactly TWO different post variants for the idea you are given.
2. Each post must serve the requested goal, fit the business niche when one is given,
   and end with a fitting call to action and a few relevant hashtags.
3. Suggest ONE image prompt, in English, describing a photo or illustration that would
   accompany the posts. No text inside the image.

## Style
If a writing sample is provided, imitate its tone, vocabulary, sentence length and emoji
habits closely. Never copy sentences from it.

## Output Format
Respond with valid JSON only:
{"posts": ["first post", "second post"], "imagePrompt": "english image description"}"#
    }

    fn posts_user_prompt(idea: &str, style_sample: &str, goal: Goal, niche: &str) -> String {
        let mut prompt = format!("Post idea: {}\nGoal of the post: {}\n", idea, goal.label());
        if !niche.is_empty() {
            prompt.push_str(&format!("Business niche: {}\n", niche));
        }
        if !style_sample.is_empty() {
            prompt.push_str(&format!(
                "\nWriting sample to imitate:\n\"\"\"\n{}\n\"\"\"\n",
                style_sample
            ));
        }
        prompt
    }

    fn refine_prompt(current: &str, instruction: &str) -> String {
        format!(
            "Rewrite the following social media post according to the instruction. \
             Keep the language and dialect of the original. Return only the rewritten post, \
             with no preamble.\n\nInstruction: {}\n\nPost:\n{}",
            instruction, current
        )
    }

    fn ideas_prompt(topics: &[String]) -> String {
        format!(
            "Suggest 8 short, specific and engaging social media post ideas in Egyptian Arabic \
             for someone interested in: {}. Each idea is one sentence. \
             Respond with JSON only: {{\"ideas\": [\"...\"]}}",
            topics.join("، ")
        )
    }

    /// Final image prompt: subject, style and composition hints.
    fn image_prompt(request: &ImageRequest) -> String {
        let mut prompt = format!(
            "{}. Visual style: {}. High quality, no text or watermarks.",
            request.prompt.trim_end_matches('.'),
            request.style
        );
        if request.model == ImageModel::FastEditing {
            prompt.push_str(" Square 1:1 composition.");
        }
        if let Some(logo) = &request.logo {
            prompt.push_str(match logo.position {
                LogoPosition::OnProduct => {
                    " Place the attached logo naturally on the main product, \
                     matching its perspective, lighting and material."
                }
                LogoPosition::Corner => {
                    " Place the attached logo small and clean in a corner of the image, \
                     like a brand mark, without covering the subject."
                }
            });
        }
        prompt
    }

    fn json_generation(prompt: String, system: Option<&str>, schema: Value) -> ContentRequest {
        ContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            system_instruction: system.map(|s| Content {
                role: None,
                parts: vec![Part::text(s.to_string())],
            }),
            generation_config: Some(GenerationConfig {
                temperature: Some(0.9),
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
                response_modalities: None,
            }),
        }
    }

    fn posts_request(idea: &str, style_sample: &str, goal: Goal, niche: &str) -> ContentRequest {
        Self::json_generation(
            Self::posts_user_prompt(idea, style_sample, goal, niche),
            Some(Self::posts_system_prompt()),
            json!({
                "type": "OBJECT",
                "properties": {
                    "posts": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "imagePrompt": { "type": "STRING" }
                },
                "required": ["posts", "imagePrompt"]
            }),
        )
    }

    fn ideas_request(topics: &[String]) -> ContentRequest {
        Self::json_generation(
            Self::ideas_prompt(topics),
            None,
            json!({
                "type": "OBJECT",
                "properties": {
                    "ideas": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["ideas"]
            }),
        )
    }

    fn imagen_request(request: &ImageRequest) -> Value {
        json!({
            "instances": [{ "prompt": Self::image_prompt(request) }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": request.aspect_ratio.as_str(),
                "outputMimeType": "image/jpeg"
            }
        })
    }

    fn edit_request(request: &ImageRequest) -> ContentRequest {
        let mut parts = Vec::new();
        if let Some(logo) = &request.logo {
            parts.push(Part::inline(&logo.mime_type, BASE64.encode(&logo.bytes)));
        }
        parts.push(Part::text(Self::image_prompt(request)));
        ContentRequest {
            contents: vec![Content::user(parts)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                temperature: None,
                response_mime_type: None,
                response_schema: None,
                response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
            }),
        }
    }

    /// Sanitize JSON response from the model.
    ///
    /// Models sometimes wrap JSON in markdown code blocks. This strips them.
    fn sanitize_json(raw_text: &str) -> String {
        let trimmed = raw_text.trim();

        if trimmed.starts_with("```") {
            let without_prefix = if trimmed.starts_with("```json") {
                trimmed.strip_prefix("```json").unwrap_or(trimmed)
            } else {
                trimmed.strip_prefix("```").unwrap_or(trimmed)
            };

            if let Some(end_idx) = without_prefix.rfind("```") {
                return without_prefix[..end_idx].trim().to_string();
            }
            return without_prefix.trim().to_string();
        }

        if let Some(start) = trimmed.find('{') {
            if let Some(end) = trimmed.rfind('}') {
                if start < end {
                    return trimmed[start..=end].to_string();
                }
            }
        }

        trimmed.to_string()
    }

    fn parse_posts(raw: &str) -> Result<GenerationResult, DomainError> {
        let clean = Self::sanitize_json(raw);
        let parsed: LlmPosts = serde_json::from_str(&clean).map_err(|e| {
            warn!(error = %e, json = %clean.chars().take(200).collect::<String>(), "JSON parse failed");
            DomainError::Ai(format!("Failed to parse posts JSON: {}", e))
        })?;

        let mut posts = parsed
            .posts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let (Some(first), Some(second)) = (posts.next(), posts.next()) else {
            return Err(DomainError::Ai("model returned fewer than two posts".into()));
        };
        if parsed.image_prompt.trim().is_empty() {
            return Err(DomainError::Ai("model returned an empty image prompt".into()));
        }
        Ok(GenerationResult {
            posts: [first, second],
            image_prompt: parsed.image_prompt.trim().to_string(),
        })
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, DomainError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Gemini API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))
    }

    async fn generate_text(&self, request: &ContentRequest) -> Result<String, DomainError> {
        let url = self.endpoint(&self.text_model, "generateContent");
        let response: ContentResponse = self.post(&url, request).await?;
        let text = response.text().ok_or_else(|| {
            DomainError::Ai("No text in response candidates".to_string())
        })?;
        debug!(raw_len = text.len(), "received Gemini response");
        Ok(text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline(mime_type: &str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl ContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn first_image(&self) -> Option<String> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| d.mime_type.starts_with("image/"))
            .map(|d| d.data.clone())
    }
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

/// Parsed model response (matches the posts schema).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmPosts {
    posts: Vec<String>,
    image_prompt: String,
}

#[derive(Deserialize)]
struct LlmIdeas {
    ideas: Vec<String>,
}

#[async_trait::async_trait]
impl AiPort for GeminiAdapter {
    async fn generate_posts(
        &self,
        idea: &str,
        style_sample: &str,
        goal: Goal,
        niche: &str,
    ) -> Result<GenerationResult, DomainError> {
        info!(
            idea_len = idea.len(),
            goal = %goal,
            model = %self.text_model,
            "sending post idea to Gemini"
        );
        let request = Self::posts_request(idea, style_sample, goal, niche);
        let raw = self.generate_text(&request).await?;
        let result = Self::parse_posts(&raw)?;
        info!(image_prompt_len = result.image_prompt.len(), "posts received");
        Ok(result)
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<String, DomainError> {
        info!(
            model = %request.model,
            aspect_ratio = %request.aspect_ratio,
            logo = request.logo.is_some(),
            "sending image request to Gemini"
        );
        let image = match request.model {
            ImageModel::HighQuality => {
                let url = self.endpoint(request.model.id(), "predict");
                let response: PredictResponse =
                    self.post(&url, &Self::imagen_request(request)).await?;
                response
                    .predictions
                    .into_iter()
                    .find_map(|p| p.bytes_base64_encoded)
            }
            ImageModel::FastEditing => {
                if request.aspect_ratio != AspectRatio::Square {
                    debug!(aspect_ratio = %request.aspect_ratio, "editing model renders square only");
                }
                let url = self.endpoint(request.model.id(), "generateContent");
                let response: ContentResponse =
                    self.post(&url, &Self::edit_request(request)).await?;
                response.first_image()
            }
        };
        image.ok_or_else(|| DomainError::Ai("No image returned (possibly filtered)".to_string()))
    }

    async fn refine_post(&self, current: &str, instruction: &str) -> Result<String, DomainError> {
        info!(post_len = current.len(), "sending refinement to Gemini");
        let request = ContentRequest {
            contents: vec![Content::user(vec![Part::text(Self::refine_prompt(
                current,
                instruction,
            ))])],
            system_instruction: None,
            generation_config: None,
        };
        let text = self.generate_text(&request).await?;
        Ok(text.trim().to_string())
    }

    async fn generate_post_ideas(&self, topics: &[String]) -> Result<Vec<String>, DomainError> {
        info!(topics = topics.len(), "requesting post ideas from Gemini");
        let raw = self.generate_text(&Self::ideas_request(topics)).await?;
        let clean = Self::sanitize_json(&raw);
        let parsed: LlmIdeas = serde_json::from_str(&clean)
            .map_err(|e| DomainError::Ai(format!("Failed to parse ideas JSON: {}", e)))?;
        Ok(parsed.ideas)
    }
}
