//! Training execution
//!
//! Two entry points: resume an existing session log by id, or start a new
//! one from a session template. One independent form per execution row;
//! completing is terminal, aborting deletes the in-progress log.
//!
//! The backend occasionally returns a freshly started log with an empty
//! execution list (logs and their executions are written in separate steps).
//! The client refetches once after a short delay and, if the list is still
//! empty, shows placeholder rows built from the session's exercise
//! templates. Placeholders carry negative ids and can never be saved; this
//! masks a backend race and is tracked as technical debt, not a feature.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::api::FitnessApi;
use crate::forms::{self, FormErrors};
use crate::models::{
    ExecutionLog, ExecutionLogUpdateRequest, ExerciseExecutionTemplate, LogStatus, SessionLog,
    SessionLogCreateRequest,
};

/// Delay before the one-shot refetch of an empty execution list
pub const EXECUTION_RELOAD_DELAY: Duration = Duration::from_millis(500);

/// Build display-only execution rows from the session's exercise templates.
/// Ids are negative so a save attempt is recognizably impossible; actuals
/// start out at the planned values, as the backend would initialize them.
pub fn placeholder_executions(templates: &[ExerciseExecutionTemplate]) -> Vec<ExecutionLog> {
    templates
        .iter()
        .enumerate()
        .map(|(i, t)| ExecutionLog {
            id: -(i as i64 + 1),
            exercise_template_id: t.id,
            exercise_name: t.exercise_name.clone(),
            planned_sets: t.planned_sets,
            planned_reps: t.planned_reps,
            planned_weight: t.planned_weight,
            actual_sets: t.planned_sets,
            actual_reps: t.planned_reps,
            actual_weight: t.planned_weight,
            completed: false,
            notes: None,
        })
        .collect()
}

/// Form for one execution row, pre-populated with planned and actual values
#[derive(Debug, Clone)]
pub struct ExecutionForm {
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: f64,
    pub actual_sets: i32,
    pub actual_reps: i32,
    pub actual_weight: f64,
    pub completed: bool,
    pub notes: String,
    pub errors: FormErrors,
}

impl ExecutionForm {
    pub fn from_execution(exec: &ExecutionLog) -> Self {
        Self {
            planned_sets: exec.planned_sets,
            planned_reps: exec.planned_reps,
            planned_weight: exec.planned_weight,
            actual_sets: exec.actual_sets,
            actual_reps: exec.actual_reps,
            actual_weight: exec.actual_weight,
            completed: exec.completed,
            notes: exec.notes.clone().unwrap_or_default(),
            errors: FormErrors::default(),
        }
    }

    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();
        forms::min_i32(&mut errors, "actualSets", self.actual_sets, 1);
        forms::min_i32(&mut errors, "actualReps", self.actual_reps, 1);
        forms::min_f64(&mut errors, "actualWeight", self.actual_weight, 0.0);
        forms::min_i32(&mut errors, "plannedSets", self.planned_sets, 1);
        forms::min_i32(&mut errors, "plannedReps", self.planned_reps, 1);
        forms::min_f64(&mut errors, "plannedWeight", self.planned_weight, 0.0);
        self.errors = errors;
        self.errors.is_empty()
    }
}

pub struct ExecutionView {
    api: Arc<dyn FitnessApi>,
    pub log: Option<SessionLog>,
    pub forms: BTreeMap<i64, ExecutionForm>,
    pub error_message: String,
    pub success_message: String,
}

impl ExecutionView {
    pub fn new(api: Arc<dyn FitnessApi>) -> Self {
        Self {
            api,
            log: None,
            forms: BTreeMap::new(),
            error_message: String::new(),
            success_message: String::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.log
            .as_ref()
            .is_some_and(|log| log.status == LogStatus::Completed)
    }

    /// Resume an existing log
    pub async fn resume(&mut self, log_id: i64) {
        match self.api.get_session_log(log_id).await {
            Ok(log) => self.set_log(log),
            Err(err) => self.error_message = err.user_message(),
        }
    }

    /// Start a new log from a session template
    pub async fn start(&mut self, session_template_id: i64) {
        let request = SessionLogCreateRequest {
            session_template_id,
            notes: None,
        };
        let log = match self.api.start_training(&request).await {
            Ok(log) => log,
            Err(err) => {
                self.error_message = err.user_message();
                return;
            }
        };

        let log = if log.executions.is_empty() {
            self.recover_executions(log).await
        } else {
            log
        };
        self.set_log(log);
    }

    /// One fixed-delay refetch, then the placeholder fallback
    async fn recover_executions(&mut self, log: SessionLog) -> SessionLog {
        tokio::time::sleep(EXECUTION_RELOAD_DELAY).await;

        let mut log = match self.api.get_session_log(log.id).await {
            Ok(reloaded) => reloaded,
            Err(_) => log,
        };
        if !log.executions.is_empty() {
            return log;
        }

        tracing::warn!(
            log_id = log.id,
            "Backend lieferte keine Executions, baue Platzhalter aus den Vorlagen"
        );
        match self.api.get_exercise_templates(log.session_template_id).await {
            Ok(templates) => log.executions = placeholder_executions(&templates),
            Err(err) => self.error_message = err.user_message(),
        }
        log
    }

    fn set_log(&mut self, log: SessionLog) {
        self.forms = log
            .executions
            .iter()
            .map(|exec| (exec.id, ExecutionForm::from_execution(exec)))
            .collect();
        self.log = Some(log);
    }

    /// Save one execution row. Completed logs and placeholder rows are
    /// rejected before any request is made.
    pub async fn save_execution(&mut self, execution_id: i64) -> bool {
        if self.is_completed() {
            self.error_message =
                "Training ist abgeschlossen, keine Änderungen mehr möglich.".to_string();
            return false;
        }
        if execution_id < 0 {
            // Placeholder row: there is no backend id to save against
            self.error_message =
                "Diese Übung wurde noch nicht vom Server übernommen und kann nicht gespeichert werden."
                    .to_string();
            return false;
        }
        let Some(form) = self.forms.get_mut(&execution_id) else {
            return false;
        };
        if !form.validate() {
            return false;
        }

        let request = ExecutionLogUpdateRequest {
            execution_log_id: execution_id,
            actual_sets: form.actual_sets,
            actual_reps: form.actual_reps,
            actual_weight: form.actual_weight,
            completed: Some(form.completed),
            notes: if form.notes.is_empty() {
                None
            } else {
                Some(form.notes.clone())
            },
            planned_sets: Some(form.planned_sets),
            planned_reps: Some(form.planned_reps),
            planned_weight: Some(form.planned_weight),
        };

        match self.api.update_execution_log(&request).await {
            Ok(()) => {
                self.success_message = "Übung gespeichert".to_string();
                self.error_message.clear();
                true
            }
            Err(err) => {
                self.error_message = err.user_message();
                false
            }
        }
    }

    /// Terminal: after completion no further edits are possible
    pub async fn complete(&mut self, confirmed: bool) -> bool {
        if self.is_completed() || !confirmed {
            return false;
        }
        let Some(log_id) = self.log.as_ref().map(|l| l.id) else {
            return false;
        };

        match self.api.complete_training(log_id).await {
            Ok(updated) => {
                if let Some(log) = &mut self.log {
                    log.status = updated.status;
                    log.end_time = updated.end_time;
                }
                self.success_message = "Training abgeschlossen".to_string();
                self.error_message.clear();
                true
            }
            Err(err) => {
                self.error_message = err.user_message();
                false
            }
        }
    }

    /// Delete the in-progress log
    pub async fn abort(&mut self, confirmed: bool) -> bool {
        if self.is_completed() || !confirmed {
            return false;
        }
        let Some(log_id) = self.log.as_ref().map(|l| l.id) else {
            return false;
        };

        match self.api.abort_training(log_id).await {
            Ok(()) => {
                self.log = None;
                self.forms.clear();
                true
            }
            Err(err) => {
                self.error_message = err.user_message();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{MockApi, execution_log, exercise_template, session_log};

    #[test]
    fn test_placeholders_mirror_templates() {
        let templates = vec![exercise_template(4, 2, 1), exercise_template(7, 2, 3)];
        let placeholders = placeholder_executions(&templates);

        assert_eq!(placeholders.len(), 2);
        assert_eq!(placeholders[0].id, -1);
        assert_eq!(placeholders[1].id, -2);
        assert!(placeholders.iter().all(ExecutionLog::is_placeholder));
        assert_eq!(placeholders[0].exercise_template_id, 4);
        assert_eq!(placeholders[0].planned_sets, 3);
        assert_eq!(placeholders[0].actual_sets, 3);
        assert_eq!(placeholders[1].actual_weight, 60.0);
        assert!(!placeholders[0].completed);
    }

    #[tokio::test]
    async fn test_start_with_executions_builds_forms() {
        let api = Arc::new(MockApi::default());
        *api.start_response.lock().unwrap() = Some(session_log(
            7,
            LogStatus::InProgress,
            vec![execution_log(11, 4), execution_log(12, 7)],
        ));

        let mut view = ExecutionView::new(api.clone());
        view.start(2).await;

        assert_eq!(view.forms.len(), 2);
        assert!(view.forms.contains_key(&11));
        // no retry needed
        assert!(!api.called("get_session_log"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_executions_retry_recovers_real_rows() {
        let api = Arc::new(MockApi::default());
        *api.start_response.lock().unwrap() =
            Some(session_log(7, LogStatus::InProgress, vec![]));
        api.log_responses.lock().unwrap().push_back(session_log(
            7,
            LogStatus::InProgress,
            vec![execution_log(11, 4)],
        ));

        let mut view = ExecutionView::new(api.clone());
        view.start(2).await;

        assert_eq!(api.call_count("get_session_log"), 1);
        assert!(!api.called("get_exercise_templates"));
        assert_eq!(view.forms.len(), 1);
        assert!(view.forms.contains_key(&11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_executions_fall_back_to_placeholders() {
        let api = Arc::new(MockApi::default());
        *api.start_response.lock().unwrap() =
            Some(session_log(7, LogStatus::InProgress, vec![]));
        api.log_responses
            .lock()
            .unwrap()
            .push_back(session_log(7, LogStatus::InProgress, vec![]));
        *api.exercise_templates.lock().unwrap() =
            vec![exercise_template(4, 2, 1), exercise_template(7, 2, 3)];

        let mut view = ExecutionView::new(api.clone());
        view.start(2).await;

        assert_eq!(api.call_count("get_session_log"), 1);
        assert!(api.called("get_exercise_templates"));

        let log = view.log.as_ref().unwrap();
        assert_eq!(log.executions.len(), 2);
        assert!(log.executions.iter().all(ExecutionLog::is_placeholder));
        assert_eq!(log.executions[0].planned_sets, 3);
        assert_eq!(log.executions[0].actual_weight, 60.0);
    }

    #[tokio::test]
    async fn test_placeholder_rows_cannot_be_saved() {
        let api = Arc::new(MockApi::default());
        let mut view = ExecutionView::new(api.clone());
        let templates = vec![exercise_template(4, 2, 1)];
        let mut log = session_log(7, LogStatus::InProgress, vec![]);
        log.executions = placeholder_executions(&templates);
        view.set_log(log);

        assert!(!view.save_execution(-1).await);
        assert!(!api.called("update_execution_log"));
        assert!(!view.error_message.is_empty());
    }

    #[tokio::test]
    async fn test_completed_log_permits_no_actions() {
        let api = Arc::new(MockApi::default());
        let mut view = ExecutionView::new(api.clone());
        view.set_log(session_log(
            7,
            LogStatus::Completed,
            vec![execution_log(11, 4)],
        ));

        assert!(view.is_completed());
        assert!(!view.save_execution(11).await);
        assert!(!view.complete(true).await);
        assert!(!view.abort(true).await);
        assert!(!api.called("update_execution_log"));
        assert!(!api.called("complete_training"));
        assert!(!api.called("abort_training"));
    }

    #[tokio::test]
    async fn test_invalid_row_values_do_not_reach_backend() {
        let api = Arc::new(MockApi::default());
        let mut view = ExecutionView::new(api.clone());
        view.set_log(session_log(
            7,
            LogStatus::InProgress,
            vec![execution_log(11, 4)],
        ));

        let form = view.forms.get_mut(&11).unwrap();
        form.actual_sets = 0;
        assert!(!view.save_execution(11).await);

        let form = view.forms.get_mut(&11).unwrap();
        form.actual_sets = 3;
        form.actual_weight = -5.0;
        assert!(!view.save_execution(11).await);

        assert!(!api.called("update_execution_log"));
    }

    #[tokio::test]
    async fn test_save_pushes_actuals_and_revised_plan() {
        let api = Arc::new(MockApi::default());
        let mut view = ExecutionView::new(api.clone());
        view.set_log(session_log(
            7,
            LogStatus::InProgress,
            vec![execution_log(11, 4)],
        ));

        let form = view.forms.get_mut(&11).unwrap();
        form.actual_sets = 4;
        form.actual_weight = 62.5;
        form.completed = true;
        form.planned_reps = 8;

        assert!(view.save_execution(11).await);
        let updates = api.execution_updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].execution_log_id, 11);
        assert_eq!(updates[0].actual_sets, 4);
        assert_eq!(updates[0].actual_weight, 62.5);
        assert_eq!(updates[0].completed, Some(true));
        assert_eq!(updates[0].planned_reps, Some(8));
    }

    #[tokio::test]
    async fn test_unconfirmed_complete_and_abort_do_nothing() {
        let api = Arc::new(MockApi::default());
        let mut view = ExecutionView::new(api.clone());
        view.set_log(session_log(
            7,
            LogStatus::InProgress,
            vec![execution_log(11, 4)],
        ));

        assert!(!view.complete(false).await);
        assert!(!view.abort(false).await);
        assert!(!api.called("complete_training"));
        assert!(!api.called("abort_training"));
    }

    #[tokio::test]
    async fn test_complete_is_terminal() {
        let api = Arc::new(MockApi::default());
        let mut completed = session_log(7, LogStatus::Completed, vec![]);
        completed.end_time = completed.start_time.checked_add_signed(chrono::Duration::minutes(65));
        api.log_responses.lock().unwrap().push_back(completed);

        let mut view = ExecutionView::new(api.clone());
        view.set_log(session_log(
            7,
            LogStatus::InProgress,
            vec![execution_log(11, 4)],
        ));

        assert!(view.complete(true).await);
        assert!(view.is_completed());
        assert!(view.log.as_ref().unwrap().end_time.is_some());
        // further edits are gated
        assert!(!view.save_execution(11).await);
    }

    #[tokio::test]
    async fn test_abort_deletes_log() {
        let api = Arc::new(MockApi::default());
        let mut view = ExecutionView::new(api.clone());
        view.set_log(session_log(
            7,
            LogStatus::InProgress,
            vec![execution_log(11, 4)],
        ));

        assert!(view.abort(true).await);
        assert!(api.called("abort_training"));
        assert!(view.log.is_none());
        assert!(view.forms.is_empty());
    }
}
