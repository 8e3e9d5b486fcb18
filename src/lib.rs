pub mod environment;
pub mod extraction;
pub mod gemini;
pub mod letter;
pub mod repair;
pub mod web;

pub use environment::EnvironmentConfig;
pub use extraction::ResumeExtraction;
pub use gemini::GeminiClient;
pub use web::{build_rocket, start_web_server};
