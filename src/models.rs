use crate::registry::TaskRegistry;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of checkboxes (chunks) each task is split into per day.
pub const CHUNKS_PER_TASK: u32 = 5;

/// Focus minutes represented by one chunk. Five chunks make a 45-minute goal.
pub const MINUTES_PER_CHUNK: u64 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub checked: u32,
}

impl Task {
    pub fn is_complete(&self) -> bool {
        self.checked == CHUNKS_PER_TASK
    }
}

/// Accepts ids written as JSON strings or as numbers (timestamps from older
/// exports) and keeps them as strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// One archived day. Only written by the rollover engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub completed_tasks: u32,
    pub completed_chunks: u32,
}

/// Everything one session owns: live tasks, the archived days, and the
/// anchor date used to detect a day change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppData {
    pub tasks: TaskRegistry,
    pub history: Vec<HistoryEntry>,
    pub last_visit_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub date: String,
    pub chunks_per_task: u32,
    pub minutes_per_chunk: u64,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub date: String,
    pub rolled_over: bool,
    pub archived: Option<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub label: String,
    pub chunks: u64,
    pub minutes: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub period: String,
    pub start_date: String,
    pub buckets: Vec<PeriodBucket>,
    pub total_chunks: u64,
    pub total_minutes: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub topic: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
    pub stale: bool,
}
