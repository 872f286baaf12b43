pub mod audio;
pub mod detector;
pub mod llm;
pub mod observability;
