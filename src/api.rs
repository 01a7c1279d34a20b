//! Typed client for the fitness REST backend
//!
//! One method per endpoint; every request carries the stored Basic-Auth
//! header when credentials exist. Views depend on the [`FitnessApi`] trait so
//! tests can swap in a recording fake.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::CredentialStore;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::*;

#[async_trait]
pub trait FitnessApi: Send + Sync {
    // exercises
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ApiError>;
    async fn get_exercise(&self, id: i64) -> Result<Exercise, ApiError>;
    async fn create_exercise(&self, req: &ExerciseRequest) -> Result<(), ApiError>;
    async fn update_exercise(&self, id: i64, req: &ExerciseRequest) -> Result<(), ApiError>;
    async fn delete_exercise(&self, id: i64) -> Result<(), ApiError>;

    // training plans
    async fn get_training_plans(&self) -> Result<Vec<TrainingPlanOverview>, ApiError>;
    async fn get_training_plan(&self, id: i64) -> Result<TrainingPlanDetail, ApiError>;
    async fn create_training_plan(&self, req: &TrainingPlanRequest) -> Result<(), ApiError>;
    async fn update_training_plan(&self, id: i64, req: &TrainingPlanRequest)
    -> Result<(), ApiError>;
    async fn delete_training_plan(&self, id: i64) -> Result<(), ApiError>;

    // legacy training sessions (first session design)
    async fn get_training_session(&self, id: i64) -> Result<TrainingSessionDetail, ApiError>;
    async fn create_training_session(&self, req: &TrainingSessionRequest) -> Result<(), ApiError>;
    async fn update_training_session(
        &self,
        id: i64,
        req: &TrainingSessionRequest,
    ) -> Result<(), ApiError>;
    async fn delete_training_session(&self, id: i64) -> Result<(), ApiError>;

    // session templates (newer session design)
    async fn get_session_templates(&self) -> Result<Vec<SessionTemplateOverview>, ApiError>;
    async fn create_session_template(&self, req: &SessionTemplateRequest) -> Result<(), ApiError>;
    async fn update_session_template(
        &self,
        id: i64,
        req: &SessionTemplateRequest,
    ) -> Result<(), ApiError>;
    async fn delete_session_template(&self, id: i64) -> Result<(), ApiError>;

    // exercise templates per session
    async fn get_exercise_templates(
        &self,
        session_id: i64,
    ) -> Result<Vec<ExerciseExecutionTemplate>, ApiError>;
    async fn create_exercise_template(
        &self,
        session_id: i64,
        req: &ExerciseTemplateRequest,
    ) -> Result<(), ApiError>;
    async fn update_exercise_template(
        &self,
        session_id: i64,
        id: i64,
        req: &ExerciseTemplateRequest,
    ) -> Result<(), ApiError>;
    async fn delete_exercise_template(&self, session_id: i64, id: i64) -> Result<(), ApiError>;

    // session logs
    async fn start_training(&self, req: &SessionLogCreateRequest) -> Result<SessionLog, ApiError>;
    async fn get_session_log(&self, id: i64) -> Result<SessionLog, ApiError>;
    async fn get_training_history(&self) -> Result<Vec<SessionLogSummary>, ApiError>;
    async fn update_execution_log(&self, req: &ExecutionLogUpdateRequest) -> Result<(), ApiError>;
    async fn complete_training(&self, id: i64) -> Result<SessionLog, ApiError>;
    async fn abort_training(&self, id: i64) -> Result<(), ApiError>;

    // auth
    async fn validate_credentials(&self, header: &str) -> Result<(), ApiError>;
}

pub struct HttpFitnessApi {
    client: Client,
    base_url: String,
    store: CredentialStore,
}

impl HttpFitnessApi {
    pub fn new(config: &Config, store: CredentialStore) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            store,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        // Interceptor equivalent: attach stored credentials when present
        match self.store.basic_header() {
            Some(header) => builder.header(AUTHORIZATION, header),
            None => builder,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send the request, return the raw body, map non-2xx to [`ApiError`]
    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), %body, "backend error");
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(self.request(Method::GET, path)).await
    }

    async fn write_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

#[async_trait]
impl FitnessApi for HttpFitnessApi {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        self.get_json("/exercises").await
    }

    async fn get_exercise(&self, id: i64) -> Result<Exercise, ApiError> {
        self.get_json(&format!("/exercises/{id}")).await
    }

    async fn create_exercise(&self, req: &ExerciseRequest) -> Result<(), ApiError> {
        self.write_json(Method::POST, "/exercises", req).await
    }

    async fn update_exercise(&self, id: i64, req: &ExerciseRequest) -> Result<(), ApiError> {
        self.write_json(Method::PUT, &format!("/exercises/{id}"), req)
            .await
    }

    async fn delete_exercise(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/exercises/{id}")).await
    }

    async fn get_training_plans(&self) -> Result<Vec<TrainingPlanOverview>, ApiError> {
        self.get_json("/trainingplans").await
    }

    async fn get_training_plan(&self, id: i64) -> Result<TrainingPlanDetail, ApiError> {
        self.get_json(&format!("/trainingplans/{id}")).await
    }

    async fn create_training_plan(&self, req: &TrainingPlanRequest) -> Result<(), ApiError> {
        self.write_json(Method::POST, "/trainingplans", req).await
    }

    async fn update_training_plan(
        &self,
        id: i64,
        req: &TrainingPlanRequest,
    ) -> Result<(), ApiError> {
        self.write_json(Method::PUT, &format!("/trainingplans/{id}"), req)
            .await
    }

    async fn delete_training_plan(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/trainingplans/{id}")).await
    }

    async fn get_training_session(&self, id: i64) -> Result<TrainingSessionDetail, ApiError> {
        self.get_json(&format!("/trainingsessions/{id}")).await
    }

    async fn create_training_session(&self, req: &TrainingSessionRequest) -> Result<(), ApiError> {
        self.write_json(Method::POST, "/trainingsessions", req).await
    }

    async fn update_training_session(
        &self,
        id: i64,
        req: &TrainingSessionRequest,
    ) -> Result<(), ApiError> {
        self.write_json(Method::PUT, &format!("/trainingsessions/{id}"), req)
            .await
    }

    async fn delete_training_session(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/trainingsessions/{id}")).await
    }

    async fn get_session_templates(&self) -> Result<Vec<SessionTemplateOverview>, ApiError> {
        self.get_json("/session-templates").await
    }

    async fn create_session_template(&self, req: &SessionTemplateRequest) -> Result<(), ApiError> {
        self.write_json(Method::POST, "/session-templates", req)
            .await
    }

    async fn update_session_template(
        &self,
        id: i64,
        req: &SessionTemplateRequest,
    ) -> Result<(), ApiError> {
        self.write_json(Method::PUT, &format!("/session-templates/{id}"), req)
            .await
    }

    async fn delete_session_template(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/session-templates/{id}")).await
    }

    async fn get_exercise_templates(
        &self,
        session_id: i64,
    ) -> Result<Vec<ExerciseExecutionTemplate>, ApiError> {
        self.get_json(&format!("/trainingsessions/{session_id}/exercise-templates"))
            .await
    }

    async fn create_exercise_template(
        &self,
        session_id: i64,
        req: &ExerciseTemplateRequest,
    ) -> Result<(), ApiError> {
        self.write_json(
            Method::POST,
            &format!("/trainingsessions/{session_id}/exercise-templates"),
            req,
        )
        .await
    }

    async fn update_exercise_template(
        &self,
        session_id: i64,
        id: i64,
        req: &ExerciseTemplateRequest,
    ) -> Result<(), ApiError> {
        self.write_json(
            Method::PUT,
            &format!("/trainingsessions/{session_id}/exercise-templates/{id}"),
            req,
        )
        .await
    }

    async fn delete_exercise_template(&self, session_id: i64, id: i64) -> Result<(), ApiError> {
        self.delete(&format!(
            "/trainingsessions/{session_id}/exercise-templates/{id}"
        ))
        .await
    }

    async fn start_training(&self, req: &SessionLogCreateRequest) -> Result<SessionLog, ApiError> {
        self.fetch(self.request(Method::POST, "/sessionlogs/start").json(req))
            .await
    }

    async fn get_session_log(&self, id: i64) -> Result<SessionLog, ApiError> {
        self.get_json(&format!("/sessionlogs/{id}")).await
    }

    async fn get_training_history(&self) -> Result<Vec<SessionLogSummary>, ApiError> {
        self.get_json("/sessionlogs").await
    }

    async fn update_execution_log(&self, req: &ExecutionLogUpdateRequest) -> Result<(), ApiError> {
        self.write_json(Method::PUT, "/sessionlogs/execution", req)
            .await
    }

    async fn complete_training(&self, id: i64) -> Result<SessionLog, ApiError> {
        self.fetch(
            self.request(Method::POST, &format!("/sessionlogs/{id}/complete"))
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn abort_training(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/sessionlogs/{id}")).await
    }

    async fn validate_credentials(&self, header: &str) -> Result<(), ApiError> {
        // Candidate credentials are passed explicitly so login can probe
        // before anything is stored
        let url = format!("{}/auth/validate", self.base_url);
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, header)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(())
    }
}
