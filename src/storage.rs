use crate::errors::AppError;
use crate::models::{AppData, HistoryEntry};
use crate::registry::TaskRegistry;
use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, warn};

pub const TASKS_KEY: &str = "tasks";
pub const HISTORY_KEY: &str = "history";
pub const LAST_VISIT_KEY: &str = "lastVisitDate";

/// String-keyed store of whole JSON values, kept in a single file.
///
/// Every write replaces the value under its key and rewrites the file.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Reads the value under `key`. A missing file, missing key or a value of
    /// the wrong shape yields `T::default()`.
    pub async fn get<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let mut document = self.read_document().await;
        match document.remove(key) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                error!("failed to parse stored {key}: {err}");
                T::default()
            }),
            None => T::default(),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value).map_err(AppError::internal)?;
        self.set_many(vec![(key, value)]).await
    }

    /// Overwrites several keys with one file write.
    pub async fn set_many(&self, entries: Vec<(&str, Value)>) -> Result<(), AppError> {
        let mut document = self.read_document().await;
        for (key, value) in entries {
            document.insert(key.to_string(), value);
        }

        let payload = serde_json::to_vec_pretty(&document).map_err(AppError::internal)?;
        fs::write(&self.path, payload).await.map_err(AppError::internal)?;
        Ok(())
    }

    async fn read_document(&self) -> Map<String, Value> {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(document) => document,
                Err(err) => {
                    error!("failed to parse data file: {err}");
                    Map::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => {
                error!("failed to read data file: {err}");
                Map::new()
            }
        }
    }
}

pub async fn load_data(store: &KvStore) -> AppData {
    let tasks: TaskRegistry = store.get(TASKS_KEY).await;
    let history: Vec<HistoryEntry> = store.get(HISTORY_KEY).await;
    let last_visit: String = store.get(LAST_VISIT_KEY).await;

    AppData {
        tasks,
        history,
        last_visit_date: parse_visit_date(&last_visit),
    }
}

pub async fn persist_tasks(store: &KvStore, data: &AppData) -> Result<(), AppError> {
    store.set(TASKS_KEY, &data.tasks).await
}

/// Writes the task list and the history log together.
pub async fn persist_log(store: &KvStore, data: &AppData) -> Result<(), AppError> {
    store
        .set_many(vec![
            (TASKS_KEY, to_value(&data.tasks)?),
            (HISTORY_KEY, to_value(&data.history)?),
        ])
        .await
}

pub async fn persist_data(store: &KvStore, data: &AppData) -> Result<(), AppError> {
    let last_visit = data
        .last_visit_date
        .map(|date| date.to_string())
        .unwrap_or_default();

    store
        .set_many(vec![
            (TASKS_KEY, to_value(&data.tasks)?),
            (HISTORY_KEY, to_value(&data.history)?),
            (LAST_VISIT_KEY, Value::String(last_visit)),
        ])
        .await
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(AppError::internal)
}

fn parse_visit_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.parse() {
        Ok(date) => Some(date),
        Err(err) => {
            warn!("ignoring stored last visit date {raw:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn temp_store(name: &str) -> KvStore {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("chunk_tracker_{name}_{}_{nanos}.json", std::process::id()));
        KvStore::new(path)
    }

    #[tokio::test]
    async fn missing_keys_fall_back_to_defaults() {
        let store = temp_store("defaults");
        let data = load_data(&store).await;

        assert!(data.tasks.is_empty());
        assert!(data.history.is_empty());
        assert_eq!(data.last_visit_date, None);
    }

    #[tokio::test]
    async fn keys_are_written_independently() {
        let store = temp_store("independent");
        store.set(LAST_VISIT_KEY, &"2024-02-15").await.unwrap();
        store
            .set(
                TASKS_KEY,
                &vec![Task {
                    id: "t1".into(),
                    title: "Read".into(),
                    checked: 2,
                }],
            )
            .await
            .unwrap();

        let data = load_data(&store).await;
        assert_eq!(data.tasks.len(), 1);
        assert!(data.history.is_empty());
        assert_eq!(data.last_visit_date, NaiveDate::from_ymd_opt(2024, 2, 15));

        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn persist_then_load_keeps_everything() {
        let store = temp_store("roundtrip");
        let mut data = AppData::default();
        data.tasks.add("Read");
        data.history.push(HistoryEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            completed_tasks: 1,
            completed_chunks: 5,
        });
        data.last_visit_date = NaiveDate::from_ymd_opt(2024, 1, 6);

        persist_data(&store, &data).await.unwrap();
        assert_eq!(load_data(&store).await, data);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"lastVisitDate\": \"2024-01-06\""));
        assert!(raw.contains("\"completedChunks\": 5"));

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn blank_or_garbled_visit_dates_are_absent() {
        assert_eq!(parse_visit_date(""), None);
        assert_eq!(parse_visit_date("yesterday"), None);
        assert_eq!(parse_visit_date("2024-03-01"), NaiveDate::from_ymd_opt(2024, 3, 1));
    }
}
