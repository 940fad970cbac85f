use crate::utils::config::Config;
use common::annotation::detection::Detection;
use std::path::Path;
use std::process::{Command, Stdio};

/// COCO class names, in the order the detector reports class ids.
pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// The detection model, invoked once per image.
pub trait Detector: Send + Sync {
    fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, String>;
    fn class_names(&self) -> &[String];
}

/// Case-sensitive exact match against the detector's class list.
pub fn resolve_class_id(detector: &dyn Detector, label: &str) -> Option<usize> {
    detector.class_names().iter().position(|name| name == label)
}

pub struct UltralyticsDetector {
    script_path: String,
    model_path: String,
    image_size: usize,
    confidence_threshold: f32,
    class_names: Vec<String>,
}

impl UltralyticsDetector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            script_path: config.python_script_path.clone(),
            model_path: config.model_file_path.clone(),
            image_size: config.image_size,
            confidence_threshold: config.confidence_threshold,
            class_names: COCO_CLASSES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl Detector for UltralyticsDetector {
    fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, String> {
        #[cfg(target_os = "windows")]
        let python = "python";
        #[cfg(not(target_os = "windows"))]
        let python = "python3";
        let output = Command::new(python)
            .arg(&self.script_path)
            .arg(&self.model_path)
            .arg(image_path)
            .arg(self.image_size.to_string())
            .arg(self.confidence_threshold.to_string())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| err.to_string())?;
        if !output.status.success() {
            let err = format!("Process exit with code: {}", output.status.code().unwrap_or(-1));
            return Err(err);
        }
        serde_json::from_slice::<Vec<Detection>>(&output.stdout).map_err(|err| err.to_string())
    }

    fn class_names(&self) -> &[String] {
        &self.class_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedOnly {
        class_names: Vec<String>,
    }

    impl Detector for NamedOnly {
        fn detect(&self, _image_path: &Path) -> Result<Vec<Detection>, String> {
            Ok(Vec::new())
        }

        fn class_names(&self) -> &[String] {
            &self.class_names
        }
    }

    fn coco_detector() -> NamedOnly {
        NamedOnly {
            class_names: COCO_CLASSES.iter().map(|name| name.to_string()).collect(),
        }
    }

    #[test]
    fn class_list_has_eighty_entries() {
        assert_eq!(COCO_CLASSES.len(), 80);
    }

    #[test]
    fn resolves_known_labels_to_their_index() {
        let detector = coco_detector();
        assert_eq!(resolve_class_id(&detector, "person"), Some(0));
        assert_eq!(resolve_class_id(&detector, "tv"), Some(62));
        assert_eq!(resolve_class_id(&detector, "toothbrush"), Some(79));
    }

    #[test]
    fn lookup_is_case_sensitive_and_exact() {
        let detector = coco_detector();
        assert_eq!(resolve_class_id(&detector, "Person"), None);
        assert_eq!(resolve_class_id(&detector, "person "), None);
        assert_eq!(resolve_class_id(&detector, "unicorn"), None);
    }

    #[test]
    fn detection_parses_from_detector_output() {
        let payload = r#"[{"class_id": 62, "x_min": 100.0, "y_min": 50.0, "x_max": 300.0, "y_max": 200.0, "confidence": 0.87}]"#;
        let detections = serde_json::from_str::<Vec<Detection>>(payload).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].class_id, 62);
        assert_eq!(detections[0].pixel_corners(), (100, 50, 300, 200));
    }
}
