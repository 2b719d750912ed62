pub mod compare;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod report;
pub mod search;
pub mod server;
pub mod validate;
