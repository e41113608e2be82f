use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::collaborator::{
    CancelToken, CollaboratorError, DialogueCollaborator, DialogueRequest,
};
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::llm_decode::decode_character_reply;
use crate::model::message::{Speaker, Turn};
use crate::model::reply::CharacterReply;
use crate::ui::settings::Settings;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Deserialize, Debug)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn reply_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "text": { "type": "STRING" },
            "emotion": { "type": "STRING" },
            "affectionChange": { "type": "INTEGER" }
        },
        "required": ["text", "emotion", "affectionChange"]
    })
}

fn turn_content(turn: &Turn) -> Content {
    let role = match turn.speaker {
        Speaker::User => "user",
        Speaker::Character => "model",
    };
    Content {
        role: Some(role.into()),
        parts: vec![Part {
            text: turn.text.clone(),
        }],
    }
}

/// Build the request body. The history already ends with the player's turn,
/// so the player text is not appended a second time.
pub fn build_request(request: &DialogueRequest<'_>) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request.history.iter().map(turn_content).collect();
    if contents.is_empty() {
        contents.push(turn_content(&Turn::user(request.player_text)));
    }

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: PromptBuilder::system_instruction(request.phase).to_string(),
            }],
        },
        contents,
        generation_config: GenerationConfig {
            response_mime_type: "application/json".into(),
            response_schema: reply_schema(),
        },
    }
}

/// Dialogue collaborator backed by Gemini `generateContent`.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, CollaboratorError> {
        let api_key = settings
            .api_key()
            .ok_or(CollaboratorError::MissingCredential)?
            .to_string();
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.dialogue.endpoint.trim_end_matches('/').to_string(),
            model: settings.dialogue.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl DialogueCollaborator for GeminiClient {
    fn generate_reply(
        &mut self,
        request: &DialogueRequest<'_>,
        cancel: &CancelToken,
    ) -> Result<CharacterReply, CollaboratorError> {
        cancel.check()?;
        debug!(
            "dialogue {} -> {} ({} turns, phase {})",
            request.id,
            self.model,
            request.history.len(),
            request.phase
        );

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(request))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CollaboratorError::Status(status.as_u16()));
        }
        let body = resp.json::<GenerateContentResponse>()?;
        cancel.check()?;

        let text = body.text().ok_or(CollaboratorError::EmptyResponse)?;
        Ok(decode_character_reply(&text)?)
    }
}

/// Cheap reachability probe used by the setup screen.
pub fn test_connection(settings: &Settings) -> anyhow::Result<String> {
    let api_key = settings
        .api_key()
        .ok_or_else(|| anyhow::anyhow!("no API key configured"))?;
    let client = Client::builder().timeout(settings.request_timeout()).build()?;
    let resp: Value = client
        .get(format!(
            "{}/models",
            settings.dialogue.endpoint.trim_end_matches('/')
        ))
        .header("x-goog-api-key", api_key)
        .send()?
        .error_for_status()?
        .json()?;

    Ok(format!(
        "Connected ({} models available)",
        resp["models"].as_array().map(|a| a.len()).unwrap_or(0)
    ))
}
