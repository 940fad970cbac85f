use crate::utils::logging::*;
use ab_glyph::{FontRef, PxScale};
use common::annotation::detection::Detection;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

//Presentation constants, deliberately not configurable.
const BORDER_COLOR: [u8; 3] = [0, 255, 0];
const TEXT_COLOR: [u8; 3] = [0, 255, 0];
const BORDER_WIDTH: u32 = 2;
const FONT_SIZE: f32 = 20.0;
const LABEL_TEXT_HEIGHT: i64 = 24;

pub struct Renderer {
    font: FontRef<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, LogEntry> {
        let font_data: &'static [u8] = include_bytes!("../../assets/DejaVuSans.ttf");
        let font = FontRef::try_from_slice(font_data)
            .map_err(|_| error_entry!(ImageEntry::FontError))?;
        Ok(Self { font })
    }

    /// Draws every detection and the label text on a copy of the image.
    /// With no detections the returned buffer equals the source pixels.
    pub fn render(&self, image: &RgbImage, detections: &[Detection], label: &str) -> RgbImage {
        let mut canvas = image.clone();
        for detection in detections {
            self.draw_detection(&mut canvas, detection, label);
        }
        canvas
    }

    fn draw_detection(&self, canvas: &mut RgbImage, detection: &Detection, label: &str) {
        let (x_min, y_min, x_max, y_max) = detection.pixel_corners();
        if x_max <= x_min || y_max <= y_min {
            return;
        }
        let base_rectangle = Rect::at(x_min as i32, y_min as i32)
            .of_size((x_max - x_min) as u32, (y_max - y_min) as u32);
        for i in 0..BORDER_WIDTH {
            let offset_rectangle = Rect::at(base_rectangle.left() - i as i32, base_rectangle.top() - i as i32)
                .of_size(base_rectangle.width() + 2 * i, base_rectangle.height() + 2 * i);
            draw_hollow_rect_mut(canvas, offset_rectangle, Rgb(BORDER_COLOR));
        }
        let scale = PxScale::from(FONT_SIZE);
        let text_x = x_min as i32;
        let text_y = (y_min - LABEL_TEXT_HEIGHT).max(0) as i32;
        draw_text_mut(canvas, Rgb(TEXT_COLOR), text_x, text_y, scale, &self.font, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([10, 10, 10]))
    }

    #[test]
    fn render_does_not_mutate_the_source() {
        let renderer = Renderer::new().unwrap();
        let image = blank_image(320, 240);
        let detections = [Detection::new(0, 50.0, 60.0, 150.0, 160.0, 0.9)];
        let _ = renderer.render(&image, &detections, "person");
        assert_eq!(image, blank_image(320, 240));
    }

    #[test]
    fn render_draws_the_border_at_the_corners() {
        let renderer = Renderer::new().unwrap();
        let image = blank_image(320, 240);
        let detections = [Detection::new(0, 50.0, 60.0, 150.0, 160.0, 0.9)];
        let annotated = renderer.render(&image, &detections, "person");
        assert_eq!(*annotated.get_pixel(50, 60), Rgb(BORDER_COLOR));
        assert_eq!(*annotated.get_pixel(150, 60), Rgb(BORDER_COLOR));
        assert_eq!(*annotated.get_pixel(50, 160), Rgb(BORDER_COLOR));
        assert_eq!(*annotated.get_pixel(100, 60), Rgb(BORDER_COLOR));
        assert_eq!(*annotated.get_pixel(100, 100), Rgb([10, 10, 10]));
    }

    #[test]
    fn render_without_detections_returns_identical_pixels() {
        let renderer = Renderer::new().unwrap();
        let image = blank_image(64, 48);
        let annotated = renderer.render(&image, &[], "person");
        assert_eq!(annotated, image);
    }

    #[test]
    fn render_is_deterministic() {
        let renderer = Renderer::new().unwrap();
        let image = blank_image(320, 240);
        let detections = [Detection::new(0, 10.0, 30.0, 200.0, 220.0, 0.5)];
        let first = renderer.render(&image, &detections, "person");
        let second = renderer.render(&image, &detections, "person");
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_boxes_are_skipped() {
        let renderer = Renderer::new().unwrap();
        let image = blank_image(64, 48);
        let detections = [Detection::new(0, 20.0, 20.0, 20.0, 40.0, 0.9)];
        let annotated = renderer.render(&image, &detections, "person");
        assert_eq!(annotated, image);
    }
}
