use crate::models::{CHUNKS_PER_TASK, HistoryEntry, Task};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The export file: the whole task list and history, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub tasks: Vec<Task>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("backup must be a JSON object")]
    NotAnObject,
    #[error("backup is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("backup field `{0}` must be an array")]
    NotAnArray(&'static str),
    #[error("backup field `{field}` has an invalid entry: {source}")]
    InvalidEntry {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("task `{title}` has {checked} chunks, more than {max}", max = CHUNKS_PER_TASK)]
    ProgressOutOfRange { title: String, checked: u32 },
}

pub fn export_document(tasks: &[Task], history: &[HistoryEntry]) -> BackupDocument {
    BackupDocument {
        tasks: tasks.to_vec(),
        history: history.to_vec(),
    }
}

pub fn to_pretty_json(document: &BackupDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Validates raw backup text. Nothing is applied here, so a rejected
/// document cannot touch the current state.
pub fn parse_document(raw: &str) -> Result<BackupDocument, BackupError> {
    let value: Value = serde_json::from_str(raw).map_err(BackupError::Malformed)?;
    let Value::Object(mut object) = value else {
        return Err(BackupError::NotAnObject);
    };

    let tasks_value = take_array(&mut object, "tasks")?;
    let history_value = take_array(&mut object, "history")?;

    let tasks: Vec<Task> = serde_json::from_value(tasks_value)
        .map_err(|source| BackupError::InvalidEntry { field: "tasks", source })?;
    let history: Vec<HistoryEntry> = serde_json::from_value(history_value)
        .map_err(|source| BackupError::InvalidEntry { field: "history", source })?;

    if let Some(task) = tasks.iter().find(|task| task.checked > CHUNKS_PER_TASK) {
        return Err(BackupError::ProgressOutOfRange {
            title: task.title.clone(),
            checked: task.checked,
        });
    }

    Ok(BackupDocument { tasks, history })
}

fn take_array(
    object: &mut serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<Value, BackupError> {
    match object.remove(field) {
        Some(value @ Value::Array(_)) => Ok(value),
        Some(_) => Err(BackupError::NotAnArray(field)),
        None => Err(BackupError::MissingField(field)),
    }
}
