//! Typed access to the task backend's HTTP API.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::GatewayError;
use crate::protocol::{AuthReply, Task, TaskDraft, TaskId, TaskListReply};

/// The three remote operations the engine performs.
///
/// A trait seam so the engine can be driven against a scripted backend in
/// tests; [`HttpGateway`] is the production implementation.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Exchange credentials for a bearer token. Unauthenticated; failure
    /// arrives in the reply body, not as an error.
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthReply, GatewayError>;

    /// Fetch the full task collection in server order.
    async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, GatewayError>;

    /// Submit a new task; returns the server-assigned id.
    async fn create_task(&self, token: &str, draft: &TaskDraft) -> Result<TaskId, GatewayError>;
}

/// [`Gateway`] over HTTP+JSON with bearer authentication.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// `base_url` is the backend origin, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthReply, GatewayError> {
        let reply = self
            .client
            .post(self.url("/api/tokens"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?
            .error_for_status()?
            .json::<AuthReply>()
            .await?;
        Ok(reply)
    }

    async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, GatewayError> {
        let reply = self
            .client
            .get(self.url("/api/tasks"))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json::<TaskListReply>()
            .await?;
        Ok(reply.tasks)
    }

    async fn create_task(&self, token: &str, draft: &TaskDraft) -> Result<TaskId, GatewayError> {
        let body = self
            .client
            .post(self.url("/api/tasks"))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        // The success shape is `{id}`; error bodies are not otherwise
        // constrained, so anything without an id is a rejection.
        match body.get("id") {
            Some(id) => Ok(serde_json::from_value(id.clone())?),
            None => Err(GatewayError::Rejected(reject_cause(&body))),
        }
    }
}

/// Best-effort human-readable cause from an unconstrained error body.
fn reject_cause(body: &Value) -> String {
    body.get("cause")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let gateway = HttpGateway::new("http://localhost:8080/");
        assert_eq!(gateway.url("/api/tasks"), "http://localhost:8080/api/tasks");
    }

    #[test]
    fn reject_cause_prefers_cause_field() {
        assert_eq!(reject_cause(&json!({"error": true, "cause": "no quota"})), "no quota");
        assert_eq!(reject_cause(&json!({"error": "denied"})), "denied");
        assert_eq!(reject_cause(&json!({"weird": 1})), r#"{"weird":1}"#);
    }
}
