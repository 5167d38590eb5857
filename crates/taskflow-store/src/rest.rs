use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use taskflow_core::{NewTask, Profile, Task, TaskChanges, TaskId, UserId};
use tracing::{debug, warn};

use crate::{StoreError, TaskStore};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Connection settings for a hosted PostgREST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Public API key sent in the `apikey` header.
    pub api_key: String,
    /// Session token of the signed-in user; falls back to the API key.
    pub access_token: Option<String>,
}

/// Task store speaking the PostgREST dialect over HTTPS.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    config: RestConfig,
}

impl RestStore {
    /// Create a store with a fresh HTTP client.
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Connection settings in use.
    #[must_use]
    pub const fn config(&self) -> &RestConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        request
            .header("apikey", &self.config.api_key)
            .header(AUTHORIZATION, format!("Bearer {token}"))
    }

    fn list_request(&self, user: UserId) -> RequestBuilder {
        self.authorize(self.client.get(self.endpoint("rest/v1/tasks")).query(&[
            ("select", "*".to_owned()),
            ("user_id", format!("eq.{user}")),
            ("order", "created_at.desc".to_owned()),
        ]))
    }

    fn profile_request(&self, user: UserId) -> RequestBuilder {
        self.authorize(
            self.client
                .get(self.endpoint("rest/v1/profiles"))
                .query(&[("select", "*".to_owned()), ("id", format!("eq.{user}"))])
                .header(ACCEPT, SINGLE_OBJECT),
        )
    }

    fn insert_request(&self, user: UserId, task: NewTask) -> RequestBuilder {
        self.authorize(
            self.client
                .post(self.endpoint("rest/v1/tasks"))
                .query(&[("select", "*")])
                .header("Prefer", RETURN_REPRESENTATION)
                .header(ACCEPT, SINGLE_OBJECT)
                .json(&task.into_insert(user)),
        )
    }

    fn update_request(&self, id: TaskId, changes: &TaskChanges) -> RequestBuilder {
        self.authorize(
            self.client
                .patch(self.endpoint("rest/v1/tasks"))
                .query(&[("id", format!("eq.{id}")), ("select", "*".to_owned())])
                .header("Prefer", RETURN_REPRESENTATION)
                .header(ACCEPT, SINGLE_OBJECT)
                .json(changes),
        )
    }

    fn delete_request(&self, id: TaskId) -> RequestBuilder {
        // A single-object representation turns "no row deleted" into 406.
        self.authorize(
            self.client
                .delete(self.endpoint("rest/v1/tasks"))
                .query(&[("id", format!("eq.{id}"))])
                .header("Prefer", RETURN_REPRESENTATION)
                .header(ACCEPT, SINGLE_OBJECT),
        )
    }

    fn logout_request(&self) -> RequestBuilder {
        self.authorize(self.client.post(self.endpoint("auth/v1/logout")))
    }

    async fn send(request: RequestBuilder, subject: &str) -> Result<Response, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), subject, "Store request failed");
        Err(StoreError::from_status(status.as_u16(), subject, &body))
    }

    async fn fetch<T: DeserializeOwned>(
        request: RequestBuilder,
        subject: &str,
    ) -> Result<T, StoreError> {
        Ok(Self::send(request, subject).await?.json::<T>().await?)
    }

    /// End the remote session of the configured access token.
    ///
    /// # Errors
    /// Returns an error when the auth endpoint rejects the request or is unreachable.
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        Self::send(self.logout_request(), "session").await?;
        debug!("Signed out remote session");
        Ok(())
    }
}

impl TaskStore for RestStore {
    async fn list_tasks(&self, user: UserId) -> Result<Vec<Task>, StoreError> {
        let tasks: Vec<Task> = Self::fetch(self.list_request(user), "task list").await?;
        debug!(%user, count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    async fn get_profile(&self, user: UserId) -> Result<Profile, StoreError> {
        Self::fetch(self.profile_request(user), &format!("profile {user}")).await
    }

    async fn insert_task(&self, user: UserId, task: NewTask) -> Result<Task, StoreError> {
        let task: Task = Self::fetch(self.insert_request(user, task), "task insert").await?;
        debug!(task = %task.id, "Inserted task");
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, changes: &TaskChanges) -> Result<Task, StoreError> {
        Self::fetch(self.update_request(id, changes), &format!("task {id}")).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        Self::send(self.delete_request(id), &format!("task {id}")).await?;
        debug!(task = %id, "Deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use taskflow_core::TaskStatus;

    fn store(token: Option<&str>) -> RestStore {
        RestStore::new(RestConfig {
            base_url: "https://project.example.invalid/".into(),
            api_key: "anon-key".into(),
            access_token: token.map(str::to_owned),
        })
    }

    fn build(request: RequestBuilder) -> reqwest::Request {
        request
            .build()
            .unwrap_or_else(|err| panic!("request must build: {err}"))
    }

    fn header<'a>(request: &'a reqwest::Request, name: &str) -> &'a str {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_else(|| panic!("missing header {name}"))
    }

    #[test]
    fn list_filters_by_owner_newest_first() {
        let user = UserId::new();
        let request = build(store(Some("jwt")).list_request(user));
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/tasks");
        let query = request.url().query().unwrap_or_default().to_owned();
        assert!(query.contains(&format!("user_id=eq.{user}")));
        assert!(query.contains("order=created_at.desc"));
        assert_eq!(header(&request, "apikey"), "anon-key");
        assert_eq!(header(&request, "authorization"), "Bearer jwt");
    }

    #[test]
    fn bearer_falls_back_to_api_key() {
        let request = build(store(None).logout_request());
        assert_eq!(request.url().path(), "/auth/v1/logout");
        assert_eq!(header(&request, "authorization"), "Bearer anon-key");
    }

    #[test]
    fn update_sends_partial_body_and_wants_single_row() {
        let id = TaskId::new();
        let request = build(store(Some("jwt")).update_request(id, &TaskChanges::status(TaskStatus::Completed)));
        assert_eq!(request.method(), Method::PATCH);
        assert!(
            request
                .url()
                .query()
                .is_some_and(|query| query.contains(&format!("id=eq.{id}")))
        );
        assert_eq!(header(&request, "prefer"), RETURN_REPRESENTATION);
        assert_eq!(header(&request, "accept"), SINGLE_OBJECT);
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .unwrap_or_else(|| panic!("body must be buffered"));
        let json: serde_json::Value =
            serde_json::from_slice(body).unwrap_or_else(|err| panic!("body must be JSON: {err}"));
        assert_eq!(json, serde_json::json!({ "status": "completed" }));
    }

    #[test]
    fn insert_carries_owner_and_defaults() {
        let user = UserId::new();
        let request = build(store(Some("jwt")).insert_request(user, NewTask::titled("Ship")));
        assert_eq!(request.method(), Method::POST);
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .unwrap_or_else(|| panic!("body must be buffered"));
        let json: serde_json::Value =
            serde_json::from_slice(body).unwrap_or_else(|err| panic!("body must be JSON: {err}"));
        assert_eq!(json["user_id"], serde_json::json!(user.to_string()));
        assert_eq!(json["status"], "pending");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["due_date"], serde_json::Value::Null);
    }
}
