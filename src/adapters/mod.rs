pub mod gemini;
pub mod github;
pub mod http;
