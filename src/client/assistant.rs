//! Assistant configuration sent to the voice client when a call starts
//!
//! Serializes to the camelCase JSON shape the voice SDK expects. Template
//! placeholders such as `{{topic}}` are filled in by the SDK from
//! [`AssistantOverrides::variable_values`].

use crate::config::CompanionProps;
use crate::messages::{ConversationContext, Role};
use serde::Serialize;

/// Voice used when the voice/style pair is unknown
pub const FALLBACK_VOICE_ID: &str = "sarah";

/// ElevenLabs voice ids by voice and conversation style
const VOICES: &[(&str, &str, &str)] = &[
    ("male", "casual", "2BJW5coyhAzSr8STdHbE"),
    ("male", "formal", "c6SfcYrb2t09NHXiT80T"),
    ("female", "casual", "ZIlrSGI4jZqobxRKprJz"),
    ("female", "formal", "sarah"),
];

const FIRST_MESSAGE: &str =
    "Hello, let's start the session. Today we'll be talking about {{topic}}.";

const SYSTEM_PROMPT: &str = "You are a knowledgeable tutor running a real-time voice session with a student. \
Teach the student about {{ topic }} within {{ subject }}.

Guidelines:
Stay on the given topic and subject.
Check in with the student regularly to make sure they are following.
Break the topic into small parts and teach one part at a time.
Keep the conversation in a {{ style }} style.
Keep replies short, like in a real spoken conversation.
Do not use special characters, this is a voice conversation.";

/// Resolve the voice id for a voice/style pair
pub fn voice_id_for(voice: &str, style: &str) -> &'static str {
    let voice = voice.trim().to_ascii_lowercase();
    let style = style.trim().to_ascii_lowercase();
    VOICES
        .iter()
        .find(|(v, s, _)| *v == voice && *s == style)
        .map(|(_, _, id)| *id)
        .unwrap_or(FALLBACK_VOICE_ID)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriberConfig {
    pub provider: String,
    pub model: String,
    pub language: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub provider: String,
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub speed: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    pub messages: Vec<PromptMessage>,
}

/// Assistant definition for one companion
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub name: String,
    pub first_message: String,
    pub transcriber: TranscriberConfig,
    pub voice: VoiceConfig,
    pub model: ModelConfig,
    pub client_messages: Vec<String>,
    pub server_messages: Vec<String>,
}

impl AssistantConfig {
    pub fn for_companion(voice: &str, style: &str) -> Self {
        Self {
            name: "Companion".to_string(),
            first_message: FIRST_MESSAGE.to_string(),
            transcriber: TranscriberConfig {
                provider: "deepgram".to_string(),
                model: "nova-3".to_string(),
                language: "en".to_string(),
            },
            voice: VoiceConfig {
                provider: "11labs".to_string(),
                voice_id: voice_id_for(voice, style).to_string(),
                stability: 0.4,
                similarity_boost: 0.8,
                speed: 1.0,
                style: 0.5,
                use_speaker_boost: true,
            },
            model: ModelConfig {
                provider: "openai".to_string(),
                model: "gpt-4".to_string(),
                messages: vec![PromptMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                }],
            },
            client_messages: Vec::new(),
            server_messages: Vec::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariableValues {
    pub subject: String,
    pub topic: String,
    pub style: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextMessage {
    pub role: Role,
    pub content: String,
}

/// Per-call overrides: template variables plus recent conversation context
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantOverrides {
    pub variable_values: VariableValues,
    pub context: Vec<ContextMessage>,
}

impl AssistantOverrides {
    pub fn new(props: &CompanionProps, context: &ConversationContext) -> Self {
        Self {
            variable_values: VariableValues {
                subject: context.subject.clone(),
                topic: context.topic.clone(),
                style: props.style.clone(),
            },
            context: context
                .window
                .iter()
                .map(|m| ContextMessage {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect(),
        }
    }
}
