mod yolo_command_detector;

pub use yolo_command_detector::YoloCommandDetector;
