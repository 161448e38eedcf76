pub mod context;
pub mod storage;
pub mod types;

pub use context::{ConversationContext, Preferences, VoiceQuality};
pub use storage::{ContextWindow, Transcript};
pub use types::{Message, Role};
