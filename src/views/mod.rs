//! View-controllers
//!
//! Each SPA view becomes a controller struct: it owns its form state, its
//! banner messages and its slice of fetched data, and talks to the backend
//! through the [`FitnessApi`](crate::api::FitnessApi) trait. No controller
//! shares state with another; everything is re-fetched after a mutation.

pub mod execution;
pub mod exercises;
pub mod history;
pub mod plans;
pub mod templates;

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fake of the API trait for controller tests

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::api::FitnessApi;
    use crate::error::ApiError;
    use crate::models::*;

    #[derive(Default)]
    pub struct MockApi {
        pub calls: Mutex<Vec<String>>,
        pub exercises: Mutex<Vec<Exercise>>,
        pub plans: Mutex<Vec<TrainingPlanOverview>>,
        pub plan_detail: Mutex<Option<TrainingPlanDetail>>,
        pub session_detail: Mutex<Option<TrainingSessionDetail>>,
        pub session_updates: Mutex<Vec<(i64, TrainingSessionRequest)>>,
        pub session_templates: Mutex<Vec<SessionTemplateOverview>>,
        pub exercise_templates: Mutex<Vec<ExerciseExecutionTemplate>>,
        pub template_save_error: Mutex<Option<ApiError>>,
        pub start_response: Mutex<Option<SessionLog>>,
        pub log_responses: Mutex<VecDeque<SessionLog>>,
        pub execution_updates: Mutex<Vec<ExecutionLogUpdateRequest>>,
        pub history: Mutex<Vec<SessionLogSummary>>,
    }

    impl MockApi {
        fn record(&self, name: &str) {
            self.calls.lock().unwrap().push(name.to_string());
        }

        pub fn called(&self, name: &str) -> bool {
            self.calls.lock().unwrap().iter().any(|c| c == name)
        }

        pub fn call_count(&self, name: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
        }
    }

    #[async_trait]
    impl FitnessApi for MockApi {
        async fn get_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
            self.record("get_exercises");
            Ok(self.exercises.lock().unwrap().clone())
        }

        async fn get_exercise(&self, id: i64) -> Result<Exercise, ApiError> {
            self.record("get_exercise");
            self.exercises
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .ok_or_else(|| ApiError::Request("Übung nicht gefunden".to_string()))
        }

        async fn create_exercise(&self, _req: &ExerciseRequest) -> Result<(), ApiError> {
            self.record("create_exercise");
            Ok(())
        }

        async fn update_exercise(&self, _id: i64, _req: &ExerciseRequest) -> Result<(), ApiError> {
            self.record("update_exercise");
            Ok(())
        }

        async fn delete_exercise(&self, _id: i64) -> Result<(), ApiError> {
            self.record("delete_exercise");
            Ok(())
        }

        async fn get_training_plans(&self) -> Result<Vec<TrainingPlanOverview>, ApiError> {
            self.record("get_training_plans");
            Ok(self.plans.lock().unwrap().clone())
        }

        async fn get_training_plan(&self, _id: i64) -> Result<TrainingPlanDetail, ApiError> {
            self.record("get_training_plan");
            self.plan_detail
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ApiError::Request("Plan nicht gefunden".to_string()))
        }

        async fn create_training_plan(&self, _req: &TrainingPlanRequest) -> Result<(), ApiError> {
            self.record("create_training_plan");
            Ok(())
        }

        async fn update_training_plan(
            &self,
            _id: i64,
            _req: &TrainingPlanRequest,
        ) -> Result<(), ApiError> {
            self.record("update_training_plan");
            Ok(())
        }

        async fn delete_training_plan(&self, _id: i64) -> Result<(), ApiError> {
            self.record("delete_training_plan");
            Ok(())
        }

        async fn get_training_session(&self, _id: i64) -> Result<TrainingSessionDetail, ApiError> {
            self.record("get_training_session");
            self.session_detail
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ApiError::Request("Session nicht gefunden".to_string()))
        }

        async fn create_training_session(
            &self,
            _req: &TrainingSessionRequest,
        ) -> Result<(), ApiError> {
            self.record("create_training_session");
            Ok(())
        }

        async fn update_training_session(
            &self,
            id: i64,
            req: &TrainingSessionRequest,
        ) -> Result<(), ApiError> {
            self.record("update_training_session");
            self.session_updates.lock().unwrap().push((id, req.clone()));
            Ok(())
        }

        async fn delete_training_session(&self, _id: i64) -> Result<(), ApiError> {
            self.record("delete_training_session");
            Ok(())
        }

        async fn get_session_templates(&self) -> Result<Vec<SessionTemplateOverview>, ApiError> {
            self.record("get_session_templates");
            Ok(self.session_templates.lock().unwrap().clone())
        }

        async fn create_session_template(
            &self,
            _req: &SessionTemplateRequest,
        ) -> Result<(), ApiError> {
            self.record("create_session_template");
            Ok(())
        }

        async fn update_session_template(
            &self,
            _id: i64,
            _req: &SessionTemplateRequest,
        ) -> Result<(), ApiError> {
            self.record("update_session_template");
            Ok(())
        }

        async fn delete_session_template(&self, _id: i64) -> Result<(), ApiError> {
            self.record("delete_session_template");
            Ok(())
        }

        async fn get_exercise_templates(
            &self,
            _session_id: i64,
        ) -> Result<Vec<ExerciseExecutionTemplate>, ApiError> {
            self.record("get_exercise_templates");
            Ok(self.exercise_templates.lock().unwrap().clone())
        }

        async fn create_exercise_template(
            &self,
            _session_id: i64,
            _req: &ExerciseTemplateRequest,
        ) -> Result<(), ApiError> {
            self.record("create_exercise_template");
            match self.template_save_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn update_exercise_template(
            &self,
            _session_id: i64,
            _id: i64,
            _req: &ExerciseTemplateRequest,
        ) -> Result<(), ApiError> {
            self.record("update_exercise_template");
            match self.template_save_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn delete_exercise_template(
            &self,
            _session_id: i64,
            _id: i64,
        ) -> Result<(), ApiError> {
            self.record("delete_exercise_template");
            Ok(())
        }

        async fn start_training(
            &self,
            _req: &SessionLogCreateRequest,
        ) -> Result<SessionLog, ApiError> {
            self.record("start_training");
            self.start_response
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ApiError::Request("Start fehlgeschlagen".to_string()))
        }

        async fn get_session_log(&self, _id: i64) -> Result<SessionLog, ApiError> {
            self.record("get_session_log");
            self.log_responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ApiError::Request("SessionLog nicht gefunden".to_string()))
        }

        async fn get_training_history(&self) -> Result<Vec<SessionLogSummary>, ApiError> {
            self.record("get_training_history");
            Ok(self.history.lock().unwrap().clone())
        }

        async fn update_execution_log(
            &self,
            req: &ExecutionLogUpdateRequest,
        ) -> Result<(), ApiError> {
            self.record("update_execution_log");
            self.execution_updates.lock().unwrap().push(req.clone());
            Ok(())
        }

        async fn complete_training(&self, _id: i64) -> Result<SessionLog, ApiError> {
            self.record("complete_training");
            self.log_responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ApiError::Request("SessionLog nicht gefunden".to_string()))
        }

        async fn abort_training(&self, _id: i64) -> Result<(), ApiError> {
            self.record("abort_training");
            Ok(())
        }

        async fn validate_credentials(&self, _header: &str) -> Result<(), ApiError> {
            self.record("validate_credentials");
            Ok(())
        }
    }

    pub fn exercise(id: i64, name: &str) -> Exercise {
        Exercise {
            id,
            name: name.to_string(),
            category: "Freihantel".to_string(),
            muscle_groups: vec!["Chest".to_string()],
            description: None,
        }
    }

    pub fn exercise_template(
        id: i64,
        session_id: i64,
        exercise_id: i64,
    ) -> ExerciseExecutionTemplate {
        ExerciseExecutionTemplate {
            id,
            session_id,
            exercise_id,
            exercise_name: format!("Übung {exercise_id}"),
            exercise_category: "Freihantel".to_string(),
            planned_sets: 3,
            planned_reps: 10,
            planned_weight: 60.0,
            order_index: 1,
        }
    }

    pub fn session_log(id: i64, status: LogStatus, executions: Vec<ExecutionLog>) -> SessionLog {
        SessionLog {
            id,
            session_template_id: 2,
            session_name: "Push Day".to_string(),
            start_time: chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(17, 30, 0)
                .unwrap(),
            end_time: None,
            status,
            notes: None,
            executions,
        }
    }

    pub fn execution_log(id: i64, template_id: i64) -> ExecutionLog {
        ExecutionLog {
            id,
            exercise_template_id: template_id,
            exercise_name: format!("Übung {template_id}"),
            planned_sets: 3,
            planned_reps: 10,
            planned_weight: 60.0,
            actual_sets: 3,
            actual_reps: 10,
            actual_weight: 60.0,
            completed: false,
            notes: None,
        }
    }
}
