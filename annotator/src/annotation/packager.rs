use crate::annotation::session::Session;
use crate::utils::logging::*;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Bundles every label file and every rendered image into the session
/// archive, under the fixed roots "labels/" and "annotated/".
pub fn pack_results(session: &Session) -> Result<PathBuf, LogEntry> {
    let archive_path = session.archive_path();
    let file = File::create(&archive_path)
        .map_err(|err| error_entry!(IOEntry::CreateFileError(archive_path.display(), err)))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    add_folder(&mut zip, &session.labels_folder(), "labels", options)?;
    add_folder(&mut zip, &session.annotated_folder(), "annotated", options)?;
    zip.finish()
        .map_err(|err| error_entry!(IOEntry::WriteFileError(archive_path.display(), std::io::Error::from(err))))?;
    Ok(archive_path)
}

fn add_folder(zip: &mut ZipWriter<File>, folder: &Path, archive_root: &str,
              options: SimpleFileOptions) -> Result<(), LogEntry>
{
    let mut file_paths = std::fs::read_dir(folder)
        .map_err(|err| error_entry!(IOEntry::ReadDirectoryError(folder.display(), err)))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .collect::<Vec<PathBuf>>();
    file_paths.sort();
    for path in file_paths {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => continue,
        };
        zip.start_file(format!("{archive_root}/{file_name}"), options)
            .map_err(|err| error_entry!(IOEntry::WriteFileError(path.display(), std::io::Error::from(err))))?;
        let mut file_contents = Vec::new();
        File::open(&path)
            .map_err(|err| error_entry!(IOEntry::ReadFileError(path.display(), err)))?
            .read_to_end(&mut file_contents)
            .map_err(|err| error_entry!(IOEntry::ReadFileError(path.display(), err)))?;
        zip.write_all(&file_contents)
            .map_err(|err| error_entry!(IOEntry::WriteFileError(path.display(), err)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use zip::read::ZipArchive;

    #[tokio::test]
    async fn archive_holds_both_file_groups_under_their_roots() {
        let working_folder = tempdir().unwrap();
        let session = Session::create(working_folder.path()).await.unwrap();
        std::fs::write(session.labels_folder().join("sample.txt"), "0 0.5 0.5 0.1 0.1").unwrap();
        std::fs::write(session.annotated_folder().join("sample.png"), b"not really a png").unwrap();
        let archive_path = pack_results(&session).unwrap();

        let mut archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        let names = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect::<Vec<String>>();
        assert_eq!(names, vec!["labels/sample.txt", "annotated/sample.png"]);

        let mut contents = String::new();
        archive.by_name("labels/sample.txt").unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "0 0.5 0.5 0.1 0.1");
    }

    #[tokio::test]
    async fn entries_are_sorted_within_each_root() {
        let working_folder = tempdir().unwrap();
        let session = Session::create(working_folder.path()).await.unwrap();
        for name in ["b.txt", "a.txt", "c.txt"] {
            std::fs::write(session.labels_folder().join(name), "x").unwrap();
        }
        let archive_path = pack_results(&session).unwrap();
        let mut archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        let names = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect::<Vec<String>>();
        assert_eq!(names, vec!["labels/a.txt", "labels/b.txt", "labels/c.txt"]);
    }
}
