pub mod handlers;
pub mod matching;
pub mod prompts;
pub mod service;
