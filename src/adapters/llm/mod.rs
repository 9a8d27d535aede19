//! Text-generation adapters.

pub mod chat_completions;
pub mod mock;

pub use chat_completions::{
    ChatClientError, ChatCompletionsClient, ChatCompletionsConfig, API_KEY_ENV,
};
pub use mock::MockTextGenerator;
