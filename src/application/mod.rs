pub mod app_error;
pub mod credentials;
pub mod review_prompt;
pub mod use_cases;
