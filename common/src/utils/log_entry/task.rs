use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TaskEntry {
    #[error("'{0}' is not in the detector class list")]
    UnknownLabel(String),
    #[error("Missing label field")]
    MissingLabelField,
    #[error("Request contains no image payloads")]
    EmptyBatch,
    #[error("Detector execution error: {0}")]
    DetectorError(String),
    #[error("No result archive for request {0}")]
    ArchiveNotFound(Uuid),
}

impl From<TaskEntry> for String {
    #[inline(always)]
    fn from(value: TaskEntry) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_label_names_the_label() {
        let message = String::from(TaskEntry::UnknownLabel("unicorn".to_string()));
        assert_eq!(message, "'unicorn' is not in the detector class list");
    }
}
