pub mod llm;
pub mod messages;
pub mod traits;
