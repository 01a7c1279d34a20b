//! Training plan management (list + detail with legacy sessions)

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::FitnessApi;
use crate::forms::{self, FormErrors};
use crate::models::{
    Exercise, TrainingPlanDetail, TrainingPlanOverview, TrainingPlanRequest,
    TrainingSessionRequest, TrainingSessionSummary,
};

#[derive(Debug, Clone, Default)]
pub struct PlanForm {
    pub name: String,
    pub description: String,
    pub errors: FormErrors,
}

impl PlanForm {
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();
        forms::require_text(&mut errors, "name", &self.name);
        forms::require_text(&mut errors, "description", &self.description);
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn to_request(&self) -> TrainingPlanRequest {
        TrainingPlanRequest {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Form for adding a legacy session to a plan
#[derive(Debug, Clone, Default)]
pub struct SessionForm {
    pub name: String,
    pub scheduled_date: Option<NaiveDate>,
    pub exercise_ids: Vec<i64>,
    pub errors: FormErrors,
}

impl SessionForm {
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();
        forms::require_text(&mut errors, "name", &self.name);
        forms::require_some(&mut errors, "scheduledDate", &self.scheduled_date);
        self.errors = errors;
        self.errors.is_empty()
    }
}

pub struct PlanListView {
    api: Arc<dyn FitnessApi>,
    pub plans: Vec<TrainingPlanOverview>,
    pub form: PlanForm,
    pub error_message: String,
    pub success_message: String,
}

impl PlanListView {
    pub fn new(api: Arc<dyn FitnessApi>) -> Self {
        Self {
            api,
            plans: Vec::new(),
            form: PlanForm::default(),
            error_message: String::new(),
            success_message: String::new(),
        }
    }

    pub async fn load(&mut self) {
        match self.api.get_training_plans().await {
            Ok(data) => self.plans = data,
            Err(err) => self.error_message = err.user_message(),
        }
    }

    pub async fn create(&mut self) -> bool {
        if !self.form.validate() {
            return false;
        }

        match self.api.create_training_plan(&self.form.to_request()).await {
            Ok(()) => {
                self.success_message = "Plan erstellt".to_string();
                self.error_message.clear();
                self.form = PlanForm::default();
                self.load().await;
                true
            }
            Err(err) => {
                self.error_message = err.user_message();
                false
            }
        }
    }

    pub async fn delete(&mut self, plan: &TrainingPlanOverview, confirmed: bool) {
        if !confirmed {
            return;
        }

        match self.api.delete_training_plan(plan.id).await {
            Ok(()) => {
                self.success_message = format!("Plan \"{}\" gelöscht", plan.name);
                self.load().await;
            }
            Err(err) => self.error_message = err.user_message(),
        }
    }
}

pub struct PlanDetailView {
    api: Arc<dyn FitnessApi>,
    pub plan_id: i64,
    pub plan: Option<TrainingPlanDetail>,
    pub available_exercises: Vec<Exercise>,
    pub edit_form: PlanForm,
    pub session_form: SessionForm,
    pub error_message: String,
    pub success_message: String,
}

impl PlanDetailView {
    pub fn new(api: Arc<dyn FitnessApi>, plan_id: i64) -> Self {
        Self {
            api,
            plan_id,
            plan: None,
            available_exercises: Vec::new(),
            edit_form: PlanForm::default(),
            session_form: SessionForm::default(),
            error_message: String::new(),
            success_message: String::new(),
        }
    }

    /// Load the plan and patch the edit form with its name/description
    pub async fn load(&mut self) {
        match self.api.get_training_plan(self.plan_id).await {
            Ok(data) => {
                self.edit_form.name = data.name.clone();
                self.edit_form.description = data.description.clone();
                self.plan = Some(data);
            }
            Err(err) => self.error_message = format!("Fehler beim Laden: {}", err.user_message()),
        }
    }

    pub async fn load_exercises(&mut self) {
        if let Ok(data) = self.api.get_exercises().await {
            self.available_exercises = data;
        }
    }

    pub async fn save_changes(&mut self) -> bool {
        if self.plan.is_none() || !self.edit_form.validate() {
            return false;
        }

        match self
            .api
            .update_training_plan(self.plan_id, &self.edit_form.to_request())
            .await
        {
            Ok(()) => {
                self.success_message = "Plan-Details erfolgreich gespeichert".to_string();
                self.error_message.clear();
                true
            }
            Err(err) => {
                self.error_message = err.user_message();
                false
            }
        }
    }

    pub async fn add_session(&mut self) -> bool {
        if self.plan.is_none() || !self.session_form.validate() {
            return false;
        }

        let request = TrainingSessionRequest {
            plan_id: self.plan_id,
            name: self.session_form.name.clone(),
            scheduled_date: self.session_form.scheduled_date,
            status: None,
            exercise_ids: self.session_form.exercise_ids.clone(),
        };

        match self.api.create_training_session(&request).await {
            Ok(()) => {
                self.session_form = SessionForm::default();
                self.success_message = "Session hinzugefügt!".to_string();
                self.error_message.clear();
                self.load().await;
                true
            }
            Err(err) => {
                self.error_message = err.user_message();
                false
            }
        }
    }

    /// Flip GEPLANT/ABGESCHLOSSEN by resubmitting the full session payload.
    /// The full session is fetched first so the existing exercise references
    /// survive the update.
    pub async fn toggle_status(&mut self, session: &TrainingSessionSummary) {
        let full = match self.api.get_training_session(session.id).await {
            Ok(data) => data,
            Err(err) => {
                self.error_message =
                    format!("Fehler beim Laden der Session-Details: {}", err.user_message());
                return;
            }
        };

        let request = TrainingSessionRequest {
            plan_id: self.plan_id,
            name: full.name.clone(),
            scheduled_date: full.scheduled_date,
            status: Some(full.status.toggled()),
            exercise_ids: full.exercise_executions.iter().map(|e| e.id).collect(),
        };

        match self.api.update_training_session(session.id, &request).await {
            Ok(()) => self.load().await,
            Err(err) => {
                self.error_message =
                    format!("Status konnte nicht geändert werden: {}", err.user_message());
            }
        }
    }

    pub async fn delete_session(&mut self, session: &TrainingSessionSummary, confirmed: bool) {
        if !confirmed {
            return;
        }

        match self.api.delete_training_session(session.id).await {
            Ok(()) => self.load().await,
            Err(err) => {
                self.error_message = format!("Löschen fehlgeschlagen: {}", err.user_message());
            }
        }
    }
}
