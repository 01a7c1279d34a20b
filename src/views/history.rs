//! Training history (read-only list of completed logs)

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::api::FitnessApi;
use crate::models::{LogStatus, SessionLogSummary};

/// `dd.MM.yyyy HH:mm`, the display format of the original UI
pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%d.%m.%Y %H:%M").to_string()
}

/// Duration between start and end, `-` while the log is still open
pub fn duration_label(start: &NaiveDateTime, end: Option<&NaiveDateTime>) -> String {
    let Some(end) = end else {
        return "-".to_string();
    };

    let minutes = (*end - *start).num_minutes();
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}min")
    } else {
        format!("{mins}min")
    }
}

pub struct HistoryView {
    api: Arc<dyn FitnessApi>,
    pub history: Vec<SessionLogSummary>,
    pub loading: bool,
    pub error_message: String,
}

impl HistoryView {
    pub fn new(api: Arc<dyn FitnessApi>) -> Self {
        Self {
            api,
            history: Vec::new(),
            loading: true,
            error_message: String::new(),
        }
    }

    /// Fetch all logs, keep only the completed ones
    pub async fn load(&mut self) {
        self.loading = true;
        match self.api.get_training_history().await {
            Ok(data) => {
                self.history = data
                    .into_iter()
                    .filter(|log| log.status == LogStatus::Completed)
                    .collect();
            }
            Err(err) => {
                self.error_message = format!(
                    "Fehler beim Laden der Trainingshistorie: {}",
                    err.user_message()
                );
            }
        }
        self.loading = false;
    }
}
