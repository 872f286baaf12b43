mod capture;
mod narration;

pub use capture::{AudioFormat, Capture};
pub use narration::NarrationOutcome;
