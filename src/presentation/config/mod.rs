mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{DetectorSettings, OpenAiSettings, ServerSettings, Settings, SettingsError};
