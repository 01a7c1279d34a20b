//! Data transfer shapes mirrored from the backend JSON (camelCase on the wire)

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Exercise category, fixed client-side set matching the backend seed data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Gerät")]
    Geraet,
    #[serde(rename = "Freihantel")]
    Freihantel,
    #[serde(rename = "Körpergewicht")]
    Koerpergewicht,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Geraet => "Gerät",
            Category::Freihantel => "Freihantel",
            Category::Koerpergewicht => "Körpergewicht",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.label() == label)
    }

    /// All categories for the selection dropdown
    pub fn all() -> &'static [Category] {
        &[
            Category::Geraet,
            Category::Freihantel,
            Category::Koerpergewicht,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRequest {
    pub name: String,
    pub category: String,
    pub muscle_groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanOverview {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub session_count: i32,
}

/// Status of a legacy training session (first session design)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "GEPLANT")]
    Geplant,
    #[serde(rename = "ABGESCHLOSSEN")]
    Abgeschlossen,
}

impl SessionStatus {
    pub fn toggled(&self) -> Self {
        match self {
            SessionStatus::Geplant => SessionStatus::Abgeschlossen,
            SessionStatus::Abgeschlossen => SessionStatus::Geplant,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Geplant => "GEPLANT",
            SessionStatus::Abgeschlossen => "ABGESCHLOSSEN",
        }
    }
}

/// Session row inside a plan detail response. The legacy design carries a
/// scheduled date and a status, the newer template design an order index;
/// the backend serves both, so all fields are optional-tolerant here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSessionSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<SessionStatus>,
    #[serde(default)]
    pub order_index: Option<i32>,
    #[serde(default)]
    pub exercise_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sessions: Vec<TrainingSessionSummary>,
    #[serde(default)]
    pub has_sessions: bool,
    #[serde(default)]
    pub sessions_hint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanRequest {
    pub name: String,
    pub description: String,
}

/// Bare exercise reference inside a legacy session detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRef {
    pub id: i64,
}

/// Full legacy session as returned by `/trainingsessions/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSessionDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    pub status: SessionStatus,
    #[serde(default)]
    pub exercise_executions: Vec<ExerciseRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSessionRequest {
    pub plan_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    pub exercise_ids: Vec<i64>,
}

// --- Session templates (newer session design) ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTemplateOverview {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub plan_id: Option<i64>,
    #[serde(default)]
    pub plan_name: String,
    pub order_index: i32,
    #[serde(default)]
    pub exercise_count: i32,
    #[serde(default)]
    pub execution_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    pub name: String,
    pub order_index: i32,
}

/// Planned sets/reps/weight for one exercise within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseExecutionTemplate {
    pub id: i64,
    pub session_id: i64,
    pub exercise_id: i64,
    #[serde(default)]
    pub exercise_name: String,
    #[serde(default)]
    pub exercise_category: String,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: f64,
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub session_id: i64,
    pub exercise_id: i64,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: f64,
    pub order_index: i32,
}

// --- Session logs ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogStatus {
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    Completed,
}

/// Actual-vs-planned record for one exercise within a session log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLog {
    pub id: i64,
    pub exercise_template_id: i64,
    #[serde(default)]
    pub exercise_name: String,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: f64,
    pub actual_sets: i32,
    pub actual_reps: i32,
    pub actual_weight: f64,
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExecutionLog {
    /// Display-only placeholder rows use negative ids and can never be saved
    pub fn is_placeholder(&self) -> bool {
        self.id < 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLog {
    pub id: i64,
    pub session_template_id: i64,
    #[serde(default)]
    pub session_name: String,
    pub start_time: NaiveDateTime,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    pub status: LogStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub executions: Vec<ExecutionLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLogSummary {
    pub id: i64,
    #[serde(default)]
    pub session_name: String,
    pub start_time: NaiveDateTime,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    pub status: LogStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLogCreateRequest {
    pub session_template_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogUpdateRequest {
    pub execution_log_id: i64,
    pub actual_sets: i32,
    pub actual_reps: i32,
    pub actual_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_sets: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_reps: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_weight: Option<f64>,
}
