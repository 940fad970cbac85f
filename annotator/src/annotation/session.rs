use crate::utils::logging::*;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Working area for one annotation request, keyed by a fresh UUID so
/// concurrent requests never share folders. The pipeline never deletes it;
/// the whole working folder goes away on service shutdown.
pub struct Session {
    pub uuid: Uuid,
    root: PathBuf,
}

impl Session {
    pub async fn create(working_folder: &Path) -> Result<Self, LogEntry> {
        let uuid = Uuid::new_v4();
        let session = Self {
            uuid,
            root: working_folder.join(uuid.to_string()),
        };
        for folder in [session.images_folder(), session.labels_folder(), session.annotated_folder()] {
            fs::create_dir_all(&folder).await
                .map_err(|err| error_entry!(IOEntry::CreateDirectoryError(folder.display(), err)))?;
        }
        Ok(session)
    }

    pub fn open(working_folder: &Path, uuid: Uuid) -> Option<Self> {
        let root = working_folder.join(uuid.to_string());
        root.is_dir().then(|| Self { uuid, root })
    }

    pub fn images_folder(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn labels_folder(&self) -> PathBuf {
        self.root.join("labels")
    }

    pub fn annotated_folder(&self) -> PathBuf {
        self.root.join("annotated")
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join("results.zip")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_builds_the_session_folders() {
        let working_folder = tempdir().unwrap();
        let session = Session::create(working_folder.path()).await.unwrap();
        assert!(session.images_folder().is_dir());
        assert!(session.labels_folder().is_dir());
        assert!(session.annotated_folder().is_dir());
        assert!(!session.archive_path().exists());
    }

    #[tokio::test]
    async fn sessions_do_not_collide() {
        let working_folder = tempdir().unwrap();
        let first = Session::create(working_folder.path()).await.unwrap();
        let second = Session::create(working_folder.path()).await.unwrap();
        assert_ne!(first.uuid, second.uuid);
        assert_ne!(first.images_folder(), second.images_folder());
    }

    #[tokio::test]
    async fn open_finds_only_existing_sessions() {
        let working_folder = tempdir().unwrap();
        let session = Session::create(working_folder.path()).await.unwrap();
        assert!(Session::open(working_folder.path(), session.uuid).is_some());
        assert!(Session::open(working_folder.path(), Uuid::new_v4()).is_none());
    }
}
