pub mod client;
pub mod response;

pub use client::{apply_chat_template, ChatBackend, LlmClient, IMAGE_SIZE};
pub use response::{extract_completion_content, ChatMessage, CompletionContent};
