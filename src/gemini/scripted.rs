//! In-memory backend that replays canned replies per model and records every call.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::{Result, StoryboardError},
    gemini::GenerativeBackend,
    models::{
        wire::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part},
        Credential,
    },
};

pub(crate) enum Reply {
    Text(String),
    Image { mime_type: String, data: String },
    Empty,
    Fail { status: u16, message: String },
    Hang,
}

impl Reply {
    pub(crate) fn fail(status: u16, message: &str) -> Self {
        Reply::Fail {
            status,
            message: message.to_string(),
        }
    }

    pub(crate) fn image(data: &str) -> Self {
        Reply::Image {
            mime_type: "image/png".to_string(),
            data: data.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub model: String,
    pub api_key: String,
    pub request: GenerateContentRequest,
}

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, model: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn models_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.model).collect()
    }
}

fn single_part(part: Part) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".to_string()),
                parts: vec![part],
            }),
        }],
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate_content(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.calls.lock().unwrap().push(Call {
            model: model.to_string(),
            api_key: credential.expose().to_string(),
            request: request.clone(),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(model)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Text(text)) => Ok(single_part(Part::Text { text })),
            Some(Reply::Image { mime_type, data }) => Ok(single_part(Part::InlineData {
                inline_data: InlineData { mime_type, data },
            })),
            Some(Reply::Empty) => Ok(GenerateContentResponse::default()),
            Some(Reply::Fail { status, message }) => Err(StoryboardError::Service { status, message }),
            Some(Reply::Hang) => futures::future::pending().await,
            None => Err(StoryboardError::Service {
                status: 500,
                message: format!("no scripted reply left for {}", model),
            }),
        }
    }
}
