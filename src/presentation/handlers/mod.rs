mod health;
mod narrate;

pub use health::health_handler;
pub use narrate::narrate_handler;
