//! Session template management (newer session design)
//!
//! List view: CRUD on reusable session templates. Detail view: the exercise
//! templates of one session, with backend field errors mapped onto the form.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::api::FitnessApi;
use crate::error::ApiError;
use crate::forms::{self, FormErrors};
use crate::models::{
    Exercise, ExerciseExecutionTemplate, ExerciseTemplateRequest, SessionTemplateOverview,
    SessionTemplateRequest, TrainingPlanOverview,
};

#[derive(Debug, Clone)]
pub struct SessionTemplateForm {
    pub name: String,
    pub plan_id: Option<i64>,
    pub order_index: i32,
    pub errors: FormErrors,
}

impl Default for SessionTemplateForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            plan_id: None,
            order_index: 1,
            errors: FormErrors::default(),
        }
    }
}

impl SessionTemplateForm {
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();
        forms::require_text(&mut errors, "name", &self.name);
        forms::min_i32(&mut errors, "orderIndex", self.order_index, 1);
        forms::max_i32(&mut errors, "orderIndex", self.order_index, 30);
        errors.carry_server_errors_from(&self.errors);
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn to_request(&self) -> SessionTemplateRequest {
        SessionTemplateRequest {
            plan_id: self.plan_id,
            name: self.name.clone(),
            order_index: self.order_index,
        }
    }
}

pub struct TemplateListView {
    api: Arc<dyn FitnessApi>,
    pub sessions: Vec<SessionTemplateOverview>,
    pub plans: Vec<TrainingPlanOverview>,
    pub editing_session_id: Option<i64>,
    pub form: SessionTemplateForm,
    pub error_message: String,
    pub success_message: String,
}

impl TemplateListView {
    pub fn new(api: Arc<dyn FitnessApi>) -> Self {
        Self {
            api,
            sessions: Vec::new(),
            plans: Vec::new(),
            editing_session_id: None,
            form: SessionTemplateForm::default(),
            error_message: String::new(),
            success_message: String::new(),
        }
    }

    pub async fn load_sessions(&mut self) {
        match self.api.get_session_templates().await {
            Ok(data) => self.sessions = data,
            Err(err) => {
                self.error_message = format!("Fehler beim Laden: {}", err.user_message());
            }
        }
    }

    /// Plans feed the optional plan dropdown; a failure here is not fatal
    pub async fn load_plans(&mut self) {
        match self.api.get_training_plans().await {
            Ok(data) => self.plans = data,
            Err(err) => tracing::warn!("Pläne nicht geladen: {err}"),
        }
    }

    pub async fn create(&mut self) -> bool {
        self.form.errors.clear_server_errors();
        if !self.form.validate() {
            return false;
        }

        match self.api.create_session_template(&self.form.to_request()).await {
            Ok(()) => {
                self.form = SessionTemplateForm::default();
                self.success_message = "Session-Vorlage erfolgreich erstellt".to_string();
                self.error_message.clear();
                self.load_sessions().await;
                true
            }
            Err(err) => {
                self.apply_save_error(err);
                false
            }
        }
    }

    pub fn start_edit(&mut self, session: &SessionTemplateOverview) {
        self.editing_session_id = Some(session.id);
        self.form.name = session.name.clone();
        self.form.plan_id = session.plan_id;
        self.form.order_index = session.order_index;
        self.form.errors = FormErrors::default();
        self.error_message.clear();
        self.success_message.clear();
    }

    pub fn cancel_edit(&mut self) {
        self.editing_session_id = None;
        self.form = SessionTemplateForm::default();
        self.error_message.clear();
    }

    pub async fn update(&mut self) -> bool {
        let Some(id) = self.editing_session_id else {
            return false;
        };
        self.form.errors.clear_server_errors();
        if !self.form.validate() {
            return false;
        }

        match self.api.update_session_template(id, &self.form.to_request()).await {
            Ok(()) => {
                self.cancel_edit();
                self.success_message = "Session-Vorlage erfolgreich gespeichert".to_string();
                self.load_sessions().await;
                true
            }
            Err(err) => {
                self.apply_save_error(err);
                false
            }
        }
    }

    pub async fn delete(&mut self, session: &SessionTemplateOverview, confirmed: bool) {
        if !confirmed {
            return;
        }

        match self.api.delete_session_template(session.id).await {
            Ok(()) => {
                self.success_message = "Session-Vorlage erfolgreich gelöscht".to_string();
                self.load_sessions().await;
            }
            Err(err) => {
                self.error_message = format!("Fehler beim Löschen: {}", err.user_message());
            }
        }
    }

    fn apply_save_error(&mut self, err: ApiError) {
        if let ApiError::Validation { ref errors, .. } = err {
            self.form.errors.apply_server_errors(errors);
            self.error_message = "Bitte überprüfe die markierten Felder.".to_string();
        } else {
            self.error_message = err.user_message();
        }
    }
}

/// Form for one exercise template row
#[derive(Debug, Clone)]
pub struct ExerciseTemplateForm {
    pub exercise_id: Option<i64>,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: f64,
    pub order_index: i32,
    pub errors: FormErrors,
}

impl Default for ExerciseTemplateForm {
    fn default() -> Self {
        Self {
            exercise_id: None,
            planned_sets: 3,
            planned_reps: 10,
            planned_weight: 0.0,
            order_index: 1,
            errors: FormErrors::default(),
        }
    }
}

impl ExerciseTemplateForm {
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();
        forms::require_some(&mut errors, "exerciseId", &self.exercise_id);
        forms::min_i32(&mut errors, "plannedSets", self.planned_sets, 1);
        forms::min_i32(&mut errors, "plannedReps", self.planned_reps, 1);
        forms::min_f64(&mut errors, "plannedWeight", self.planned_weight, 0.0);
        forms::min_i32(&mut errors, "orderIndex", self.order_index, 1);
        errors.carry_server_errors_from(&self.errors);
        self.errors = errors;
        self.errors.is_empty()
    }
}

pub struct TemplateDetailView {
    api: Arc<dyn FitnessApi>,
    pub session_id: i64,
    pub available_exercises: Vec<Exercise>,
    pub templates: Vec<ExerciseExecutionTemplate>,
    pub editing_template: Option<ExerciseExecutionTemplate>,
    pub form: ExerciseTemplateForm,
    pub error_message: String,
    pub success_message: String,
}

impl TemplateDetailView {
    pub fn new(api: Arc<dyn FitnessApi>, session_id: i64) -> Self {
        Self {
            api,
            session_id,
            available_exercises: Vec::new(),
            templates: Vec::new(),
            editing_template: None,
            form: ExerciseTemplateForm::default(),
            error_message: String::new(),
            success_message: String::new(),
        }
    }

    pub async fn load_exercises(&mut self) {
        match self.api.get_exercises().await {
            Ok(data) => self.available_exercises = data,
            Err(err) => self.error_message = err.user_message(),
        }
    }

    pub async fn load_templates(&mut self) {
        match self.api.get_exercise_templates(self.session_id).await {
            Ok(data) => self.templates = data,
            Err(err) => self.error_message = err.user_message(),
        }
    }

    /// Exercises offered in the dropdown: everything not already templated
    /// into this session, except the exercise of the row being edited (it
    /// must stay selectable to keep its own assignment)
    pub fn selectable_exercises(&self) -> Vec<&Exercise> {
        let mut used: BTreeSet<i64> = self.templates.iter().map(|t| t.exercise_id).collect();
        if let Some(editing) = &self.editing_template {
            used.remove(&editing.exercise_id);
        }
        self.available_exercises
            .iter()
            .filter(|ex| !used.contains(&ex.id))
            .collect()
    }

    pub fn start_create(&mut self) {
        self.editing_template = None;
        self.form = ExerciseTemplateForm {
            order_index: self.templates.len() as i32 + 1,
            ..ExerciseTemplateForm::default()
        };
        self.error_message.clear();
    }

    pub fn edit(&mut self, template: &ExerciseExecutionTemplate) {
        self.form = ExerciseTemplateForm {
            exercise_id: Some(template.exercise_id),
            planned_sets: template.planned_sets,
            planned_reps: template.planned_reps,
            planned_weight: template.planned_weight,
            order_index: template.order_index,
            errors: FormErrors::default(),
        };
        self.editing_template = Some(template.clone());
        self.error_message.clear();
    }

    pub async fn save(&mut self) -> bool {
        self.form.errors.clear_server_errors();
        if !self.form.validate() {
            return false;
        }

        let request = ExerciseTemplateRequest {
            id: self.editing_template.as_ref().map(|t| t.id),
            session_id: self.session_id,
            exercise_id: self.form.exercise_id.unwrap_or_default(),
            planned_sets: self.form.planned_sets,
            planned_reps: self.form.planned_reps,
            planned_weight: self.form.planned_weight,
            order_index: self.form.order_index,
        };

        let result = match &self.editing_template {
            Some(editing) => {
                self.api
                    .update_exercise_template(self.session_id, editing.id, &request)
                    .await
            }
            None => {
                self.api
                    .create_exercise_template(self.session_id, &request)
                    .await
            }
        };

        match result {
            Ok(()) => {
                self.success_message = if self.editing_template.is_some() {
                    "Vorlage aktualisiert".to_string()
                } else {
                    "Vorlage hinzugefügt".to_string()
                };
                self.error_message.clear();
                self.editing_template = None;
                self.load_templates().await;
                self.start_create();
                true
            }
            Err(err) => {
                match err {
                    // Field-level errors land on the individual controls
                    ApiError::Validation { ref errors, .. } => {
                        self.form.errors.apply_server_errors(errors);
                        self.error_message = "Bitte überprüfe die markierten Felder.".to_string();
                    }
                    ApiError::Business(message) => self.error_message = message,
                    other => self.error_message = other.user_message(),
                }
                false
            }
        }
    }

    pub async fn delete(&mut self, template: &ExerciseExecutionTemplate, confirmed: bool) {
        if !confirmed {
            return;
        }

        match self
            .api
            .delete_exercise_template(self.session_id, template.id)
            .await
        {
            Ok(()) => self.load_templates().await,
            Err(err) => self.error_message = err.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::forms::{MIN, SERVER};
    use crate::views::testing::{MockApi, exercise, exercise_template};

    #[tokio::test]
    async fn test_order_index_bounds() {
        let api = Arc::new(MockApi::default());
        let mut view = TemplateListView::new(api.clone());
        view.form.name = "Push Day".to_string();

        view.form.order_index = 0;
        assert!(!view.create().await);
        view.form.order_index = 31;
        assert!(!view.create().await);
        assert!(!api.called("create_session_template"));

        view.form.order_index = 30;
        assert!(view.create().await);
        assert!(api.called("create_session_template"));
    }

    #[tokio::test]
    async fn test_start_edit_patches_form() {
        let api = Arc::new(MockApi::default());
        let mut view = TemplateListView::new(api);
        let session = SessionTemplateOverview {
            id: 3,
            name: "Pull Day".to_string(),
            plan_id: Some(1),
            plan_name: "Push/Pull".to_string(),
            order_index: 2,
            exercise_count: 4,
            execution_count: 0,
        };

        view.start_edit(&session);
        assert_eq!(view.editing_session_id, Some(3));
        assert_eq!(view.form.name, "Pull Day");
        assert_eq!(view.form.plan_id, Some(1));
        assert_eq!(view.form.order_index, 2);
    }

    #[tokio::test]
    async fn test_selectable_excludes_assigned_exercises() {
        let api = Arc::new(MockApi::default());
        let mut view = TemplateDetailView::new(api, 5);
        view.available_exercises = vec![
            exercise(1, "Bankdrücken"),
            exercise(2, "Rudern"),
            exercise(3, "Kniebeuge"),
        ];
        view.templates = vec![exercise_template(10, 5, 1), exercise_template(11, 5, 3)];

        let selectable: Vec<i64> = view.selectable_exercises().iter().map(|e| e.id).collect();
        assert_eq!(selectable, vec![2]);
    }

    #[tokio::test]
    async fn test_edited_exercise_stays_selectable() {
        let api = Arc::new(MockApi::default());
        let mut view = TemplateDetailView::new(api, 5);
        view.available_exercises = vec![exercise(1, "Bankdrücken"), exercise(2, "Rudern")];
        let assigned = exercise_template(10, 5, 1);
        view.templates = vec![assigned.clone()];

        view.edit(&assigned);
        let selectable: Vec<i64> = view.selectable_exercises().iter().map(|e| e.id).collect();
        assert_eq!(selectable, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_invalid_row_form_does_not_call_backend() {
        let api = Arc::new(MockApi::default());
        let mut view = TemplateDetailView::new(api.clone(), 5);
        view.form.exercise_id = Some(1);
        view.form.planned_sets = 0;

        assert!(!view.save().await);
        assert!(view.form.errors.has("plannedSets", MIN));
        assert!(!api.called("create_exercise_template"));
    }

    #[tokio::test]
    async fn test_server_validation_error_lands_on_control() {
        let api = Arc::new(MockApi::default());
        let mut field_errors = BTreeMap::new();
        field_errors.insert(
            "orderIndex".to_string(),
            "bereits vergeben".to_string(),
        );
        *api.template_save_error.lock().unwrap() = Some(ApiError::Validation {
            message: None,
            errors: field_errors,
        });

        let mut view = TemplateDetailView::new(api.clone(), 5);
        view.form.exercise_id = Some(1);

        assert!(!view.save().await);
        assert!(view.form.errors.has("orderIndex", SERVER));
        // client-side validators on the other controls stay untouched
        assert!(!view.form.errors.has("plannedSets", MIN));
        assert_eq!(view.error_message, "Bitte überprüfe die markierten Felder.");

        // the next save clears the server channel and goes through
        assert!(view.save().await);
        assert!(!view.form.errors.has("orderIndex", SERVER));
    }

    #[tokio::test]
    async fn test_business_error_uses_server_message() {
        let api = Arc::new(MockApi::default());
        *api.template_save_error.lock().unwrap() =
            Some(ApiError::Business("Session enthält bereits diese Übung".to_string()));

        let mut view = TemplateDetailView::new(api, 5);
        view.form.exercise_id = Some(1);

        assert!(!view.save().await);
        assert_eq!(view.error_message, "Session enthält bereits diese Übung");
    }

    #[tokio::test]
    async fn test_unconfirmed_row_delete_does_not_call_backend() {
        let api = Arc::new(MockApi::default());
        let mut view = TemplateDetailView::new(api.clone(), 5);
        let template = exercise_template(10, 5, 1);

        view.delete(&template, false).await;
        assert!(!api.called("delete_exercise_template"));

        view.delete(&template, true).await;
        assert!(api.called("delete_exercise_template"));
    }
}
