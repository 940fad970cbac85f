use serde::{Deserialize, Serialize};

/// One detector hit in pixel space. Corners may carry sub-pixel fractions;
/// every consumer works from the truncated integer corners.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub class_id: usize,
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
    pub confidence: f32,
}

impl Detection {
    pub fn new(class_id: usize, x_min: f32, y_min: f32, x_max: f32, y_max: f32, confidence: f32) -> Self {
        Self {
            class_id,
            x_min,
            y_min,
            x_max,
            y_max,
            confidence,
        }
    }

    /// Corner coordinates truncated toward zero, the detector's native precision.
    pub fn pixel_corners(&self) -> (i64, i64, i64, i64) {
        (self.x_min as i64, self.y_min as i64, self.x_max as i64, self.y_max as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_corners_truncate_toward_zero() {
        let detection = Detection::new(0, 100.9, 50.2, 300.7, 200.99, 0.9);
        assert_eq!(detection.pixel_corners(), (100, 50, 300, 200));
    }

    #[test]
    fn pixel_corners_keep_exact_integers() {
        let detection = Detection::new(3, 0.0, 0.0, 640.0, 480.0, 0.5);
        assert_eq!(detection.pixel_corners(), (0, 0, 640, 480));
    }
}
