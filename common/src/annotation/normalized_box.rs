use serde::{Deserialize, Serialize};
use crate::annotation::detection::Detection;

/// Bounding box as fractional center and size relative to the image dimensions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NormalizedBox {
    pub class_id: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    /// Dimensions must come from the decoded pixel buffer, not metadata.
    pub fn from_detection(detection: &Detection, image_width: u32, image_height: u32) -> Self {
        let (x_min, y_min, x_max, y_max) = detection.pixel_corners();
        let image_width = image_width as f64;
        let image_height = image_height as f64;
        Self {
            class_id: detection.class_id,
            center_x: (x_min + x_max) as f64 / 2.0 / image_width,
            center_y: (y_min + y_max) as f64 / 2.0 / image_height,
            width: (x_max - x_min) as f64 / image_width,
            height: (y_max - y_min) as f64 / image_height,
        }
    }

    pub fn to_label_line(&self) -> String {
        format!("{} {:.6} {:.6} {:.6} {:.6}",
                self.class_id, self.center_x, self.center_y, self.width, self.height)
    }
}
