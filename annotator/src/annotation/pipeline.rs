use crate::annotation::detector::Detector;
use crate::annotation::packager;
use crate::annotation::renderer::Renderer;
use crate::annotation::session::Session;
use crate::utils::logging::*;
use common::annotation::detection::Detection;
use common::annotation::normalized_box::NormalizedBox;
use std::fs;
use std::path::{Path, PathBuf};

/// Runs the whole annotation pass for one request: every uploaded image is
/// decoded, sent through the detector, filtered to the target class,
/// normalized, rendered and written back, then the archive is packed.
/// The first failing image aborts the request.
pub fn process_session(session: &Session, detector: &dyn Detector,
                       class_id: usize, label: &str) -> Result<PathBuf, LogEntry>
{
    let renderer = Renderer::new()?;
    for image_path in list_images(&session.images_folder())? {
        process_image(&image_path, session, detector, &renderer, class_id, label)?;
    }
    packager::pack_results(session)
}

fn list_images(images_folder: &Path) -> Result<Vec<PathBuf>, LogEntry> {
    let entries = fs::read_dir(images_folder)
        .map_err(|err| error_entry!(IOEntry::ReadDirectoryError(images_folder.display(), err)))?;
    let mut image_paths = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|err| error_entry!(IOEntry::ReadDirectoryError(images_folder.display(), err)))?;
        let path = entry.path();
        if path.is_file() {
            image_paths.push(path);
        }
    }
    //Sorted so repeat runs of the same batch stay deterministic.
    image_paths.sort();
    Ok(image_paths)
}

fn process_image(image_path: &Path, session: &Session, detector: &dyn Detector,
                 renderer: &Renderer, class_id: usize, label: &str) -> Result<(), LogEntry>
{
    let image = image::open(image_path)
        .map_err(|err| error_entry!(ImageEntry::DecodeError(image_path.display(), err)))?
        .to_rgb8();
    if image.width() == 0 || image.height() == 0 {
        return Err(error_entry!(ImageEntry::ZeroDimension(image_path.display())));
    }
    let detections = detector.detect(image_path)
        .map_err(|err| error_entry!(TaskEntry::DetectorError(err)))?;
    let kept = detections.into_iter()
        .filter(|detection| detection.class_id == class_id)
        .collect::<Vec<Detection>>();
    write_label_file(session, image_path, &kept, image.width(), image.height())?;
    let annotated = renderer.render(&image, &kept, label);
    let file_name = image_path.file_name().unwrap_or_default();
    let saved_path = session.annotated_folder().join(file_name);
    annotated.save(&saved_path)
        .map_err(|err| error_entry!(ImageEntry::EncodeError(saved_path.display(), err)))?;
    Ok(())
}

fn write_label_file(session: &Session, image_path: &Path, kept: &[Detection],
                    image_width: u32, image_height: u32) -> Result<(), LogEntry>
{
    //Images without a kept detection get no label file, only the rendered copy.
    if kept.is_empty() {
        return Ok(());
    }
    let label_lines = kept.iter()
        .map(|detection| NormalizedBox::from_detection(detection, image_width, image_height).to_label_line())
        .collect::<Vec<String>>();
    let file_stem = image_path.file_stem().unwrap_or_default();
    let label_path = session.labels_folder().join(file_stem).with_extension("txt");
    fs::write(&label_path, label_lines.join("\n"))
        .map_err(|err| error_entry!(IOEntry::WriteFileError(label_path.display(), err)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::collections::HashMap;
    use std::fs::File;
    use tempfile::tempdir;
    use zip::read::ZipArchive;

    struct FakeDetector {
        detections: HashMap<String, Vec<Detection>>,
        class_names: Vec<String>,
        fail: bool,
    }

    impl FakeDetector {
        fn new() -> Self {
            Self {
                detections: HashMap::new(),
                class_names: vec!["person".to_string(), "cat".to_string(), "tv".to_string()],
                fail: false,
            }
        }

        fn with(mut self, file_name: &str, detections: Vec<Detection>) -> Self {
            self.detections.insert(file_name.to_string(), detections);
            self
        }
    }

    impl Detector for FakeDetector {
        fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, String> {
            if self.fail {
                return Err("model exploded".to_string());
            }
            let file_name = image_path.file_name().unwrap().to_string_lossy().to_string();
            Ok(self.detections.get(&file_name).cloned().unwrap_or_default())
        }

        fn class_names(&self) -> &[String] {
            &self.class_names
        }
    }

    async fn session_with_images(images: &[(&str, u32, u32)]) -> (tempfile::TempDir, Session) {
        let working_folder = tempdir().unwrap();
        let session = Session::create(working_folder.path()).await.unwrap();
        for (file_name, width, height) in images {
            let image = RgbImage::from_pixel(*width, *height, Rgb([80, 90, 100]));
            image.save(session.images_folder().join(file_name)).unwrap();
        }
        (working_folder, session)
    }

    fn archive_names(archive_path: &Path) -> Vec<String> {
        let mut archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn writes_the_expected_label_line() {
        let (_working_folder, session) = session_with_images(&[("sample.png", 640, 480)]).await;
        let detector = FakeDetector::new()
            .with("sample.png", vec![Detection::new(2, 100.0, 50.0, 300.0, 200.0, 0.9)]);
        process_session(&session, &detector, 2, "tv").unwrap();
        let contents = fs::read_to_string(session.labels_folder().join("sample.txt")).unwrap();
        assert_eq!(contents, "2 0.312500 0.260417 0.312500 0.312500");
    }

    #[tokio::test]
    async fn filtering_is_class_exact_and_keeps_order() {
        let (_working_folder, session) = session_with_images(&[("sample.png", 640, 480)]).await;
        let detector = FakeDetector::new().with("sample.png", vec![
            Detection::new(1, 0.0, 0.0, 64.0, 48.0, 0.9),
            Detection::new(0, 10.0, 10.0, 100.0, 100.0, 0.8),
            Detection::new(0, 200.0, 200.0, 400.0, 400.0, 0.7),
            Detection::new(2, 5.0, 5.0, 50.0, 50.0, 0.6),
        ]);
        process_session(&session, &detector, 0, "person").unwrap();
        let contents = fs::read_to_string(session.labels_folder().join("sample.txt")).unwrap();
        let lines = contents.lines().collect::<Vec<&str>>();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.starts_with("0 ")));
        //Detector order among matches is preserved.
        assert_eq!(lines[0], "0 0.085938 0.114583 0.140625 0.187500");
        assert!(!contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn zero_kept_detections_still_produce_a_rendered_image() {
        let (_working_folder, session) = session_with_images(&[("empty.png", 64, 48)]).await;
        let detector = FakeDetector::new()
            .with("empty.png", vec![Detection::new(1, 1.0, 1.0, 20.0, 20.0, 0.9)]);
        let archive_path = process_session(&session, &detector, 0, "person").unwrap();
        assert!(!session.labels_folder().join("empty.txt").exists());
        assert_eq!(archive_names(&archive_path), vec!["annotated/empty.png"]);
        //Nothing was drawn, the rendered pixels equal the source.
        let source = image::open(session.images_folder().join("empty.png")).unwrap().to_rgb8();
        let rendered = image::open(session.annotated_folder().join("empty.png")).unwrap().to_rgb8();
        assert_eq!(source, rendered);
    }

    #[tokio::test]
    async fn archive_pairs_labels_with_rendered_images() {
        let (_working_folder, session) =
            session_with_images(&[("first.png", 640, 480), ("second.png", 320, 240)]).await;
        let detector = FakeDetector::new()
            .with("first.png", vec![Detection::new(0, 100.0, 50.0, 300.0, 200.0, 0.9)]);
        let archive_path = process_session(&session, &detector, 0, "person").unwrap();
        assert_eq!(
            archive_names(&archive_path),
            vec!["labels/first.txt", "annotated/first.png", "annotated/second.png"],
        );
    }

    #[tokio::test]
    async fn undecodable_image_aborts_the_request() {
        let (_working_folder, session) = session_with_images(&[]).await;
        fs::write(session.images_folder().join("broken.png"), b"not an image").unwrap();
        let detector = FakeDetector::new();
        let entry = process_session(&session, &detector, 0, "person").unwrap_err();
        assert!(entry.message.contains("Failed to decode image"));
        assert!(!session.archive_path().exists());
    }

    #[tokio::test]
    async fn detector_failure_aborts_the_request() {
        let (_working_folder, session) = session_with_images(&[("sample.png", 64, 48)]).await;
        let mut detector = FakeDetector::new();
        detector.fail = true;
        let entry = process_session(&session, &detector, 0, "person").unwrap_err();
        assert!(entry.message.contains("model exploded"));
    }

    #[tokio::test]
    async fn repeat_runs_write_identical_label_files() {
        let detector = FakeDetector::new()
            .with("sample.png", vec![Detection::new(0, 33.0, 44.0, 55.0, 66.0, 0.9)]);
        let mut label_files = Vec::new();
        for _ in 0..2 {
            let (_working_folder, session) = session_with_images(&[("sample.png", 640, 480)]).await;
            process_session(&session, &detector, 0, "person").unwrap();
            label_files.push(fs::read(session.labels_folder().join("sample.txt")).unwrap());
        }
        assert_eq!(label_files[0], label_files[1]);
    }
}
