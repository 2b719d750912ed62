pub mod client;
pub mod model;

pub use client::{CompletionError, GeminiClient};
pub use model::Model;
