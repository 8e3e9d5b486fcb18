pub mod client;
pub mod prompt;
pub mod types;

pub use client::GeminiClient;
