mod narration_service;

pub use narration_service::{
    DETECTION_SENTINEL, NarrationError, NarrationService, build_scene_prompt,
};
