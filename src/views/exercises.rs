//! Exercise management (list + detail)

use std::sync::Arc;

use crate::api::FitnessApi;
use crate::forms::{self, FormErrors};
use crate::models::{Category, Exercise, ExerciseRequest};

/// Split the comma-separated muscle-group input, trimming each entry and
/// keeping the order
pub fn split_muscle_groups(input: &str) -> Vec<String> {
    input.split(',').map(|s| s.trim().to_string()).collect()
}

/// Create/edit form: name, category and muscle groups required, description
/// optional
#[derive(Debug, Clone, Default)]
pub struct ExerciseForm {
    pub name: String,
    pub category: String,
    pub muscle_groups_input: String,
    pub description: String,
    pub errors: FormErrors,
}

impl ExerciseForm {
    /// Pre-fill from an existing exercise, like patching the edit form
    pub fn patch(&mut self, exercise: &Exercise) {
        self.name = exercise.name.clone();
        self.category = exercise.category.clone();
        self.muscle_groups_input = exercise.muscle_groups.join(", ");
        self.description = exercise.description.clone().unwrap_or_default();
    }

    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();
        forms::require_text(&mut errors, "name", &self.name);
        forms::require_text(&mut errors, "category", &self.category);
        if !self.category.trim().is_empty() && Category::from_label(self.category.trim()).is_none()
        {
            errors.add("category", forms::REQUIRED, "Unbekannte Kategorie");
        }
        forms::require_text(&mut errors, "muscleGroupsInput", &self.muscle_groups_input);
        errors.carry_server_errors_from(&self.errors);
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn to_request(&self) -> ExerciseRequest {
        ExerciseRequest {
            name: self.name.clone(),
            category: self.category.clone(),
            muscle_groups: split_muscle_groups(&self.muscle_groups_input),
            description: if self.description.is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        }
    }
}

pub struct ExerciseListView {
    api: Arc<dyn FitnessApi>,
    pub exercises: Vec<Exercise>,
    pub form: ExerciseForm,
    pub error_message: String,
    pub success_message: String,
}

impl ExerciseListView {
    pub fn new(api: Arc<dyn FitnessApi>) -> Self {
        Self {
            api,
            exercises: Vec::new(),
            form: ExerciseForm::default(),
            error_message: String::new(),
            success_message: String::new(),
        }
    }

    pub async fn load(&mut self) {
        match self.api.get_exercises().await {
            Ok(data) => self.exercises = data,
            Err(err) => self.error_message = err.user_message(),
        }
    }

    /// Create from the form; an invalid form never reaches the backend
    pub async fn create(&mut self) -> bool {
        if !self.form.validate() {
            return false;
        }

        match self.api.create_exercise(&self.form.to_request()).await {
            Ok(()) => {
                self.success_message = "Übung erstellt".to_string();
                self.error_message.clear();
                self.form = ExerciseForm::default();
                self.load().await;
                true
            }
            Err(err) => {
                self.error_message = err.user_message();
                false
            }
        }
    }

    /// Delete only with confirmation, then reload the list
    pub async fn delete(&mut self, exercise: &Exercise, confirmed: bool) {
        if !confirmed {
            return;
        }

        match self.api.delete_exercise(exercise.id).await {
            Ok(()) => {
                self.success_message = format!("Übung \"{}\" gelöscht", exercise.name);
                self.load().await;
            }
            Err(err) => self.error_message = err.user_message(),
        }
    }
}

/// Edit view for a single exercise
pub struct ExerciseDetailView {
    api: Arc<dyn FitnessApi>,
    pub exercise_id: i64,
    pub form: ExerciseForm,
    pub error_message: String,
    pub success_message: String,
}

impl ExerciseDetailView {
    pub fn new(api: Arc<dyn FitnessApi>, exercise_id: i64) -> Self {
        Self {
            api,
            exercise_id,
            form: ExerciseForm::default(),
            error_message: String::new(),
            success_message: String::new(),
        }
    }

    pub async fn load(&mut self) {
        match self.api.get_exercise(self.exercise_id).await {
            Ok(exercise) => self.form.patch(&exercise),
            Err(err) => self.error_message = err.user_message(),
        }
    }

    pub async fn save(&mut self) -> bool {
        if !self.form.validate() {
            return false;
        }

        match self
            .api
            .update_exercise(self.exercise_id, &self.form.to_request())
            .await
        {
            Ok(()) => {
                self.success_message = "Speichern erfolgreich".to_string();
                self.error_message.clear();
                true
            }
            Err(err) => {
                self.error_message = err.user_message();
                self.success_message.clear();
                false
            }
        }
    }
}
