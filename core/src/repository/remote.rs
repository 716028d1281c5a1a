use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::model::task::{NewTask, Priority, Tag, Task, TaskPatch};
use crate::repository::traits::TaskRepository;

/// Thin client over a hosted record service. Every request carries the
/// acting user's bearer token; the service scopes records to that identity,
/// which is a trust boundary this crate delegates outward.
pub struct RemoteTaskRepository {
    client: Client,
    base_url: String,
    token: String,
}

/// The service speaks camelCase (`dueDate`, `createdAt`); the canonical
/// model is snake_case. Translation happens here and nowhere else.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireTask {
    id: Uuid,
    text: String,
    done: bool,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    tag: Tag,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl From<WireTask> for Task {
    fn from(wire: WireTask) -> Self {
        Task {
            id: wire.id,
            text: wire.text,
            done: wire.done,
            priority: wire.priority,
            tag: wire.tag,
            due_date: wire.due_date,
            created_at: wire.created_at,
        }
    }
}

impl RemoteTaskRepository {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: Uuid) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }

    async fn reject(res: reqwest::Response) -> RepositoryError {
        let status = res.status().as_u16();
        let message = res.text().await.unwrap_or_default();
        RepositoryError::Rejected { status, message }
    }
}

#[async_trait]
impl TaskRepository for RemoteTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let res = self
            .client
            .get(self.tasks_url())
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Self::reject(res).await);
        }

        let tasks = res.json::<Vec<WireTask>>().await?;
        debug!(count = tasks.len(), "fetched remote task list");
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    async fn create(&self, draft: NewTask) -> Result<Task, RepositoryError> {
        // Identity and timestamp are assigned server-side.
        let mut body = serde_json::Map::new();
        body.insert("text".to_string(), json!(draft.text));
        body.insert("priority".to_string(), json!(draft.priority));
        body.insert("tag".to_string(), json!(draft.tag));
        if let Some(due_date) = draft.due_date {
            body.insert("dueDate".to_string(), json!(due_date));
        }

        let res = self
            .client
            .post(self.tasks_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Self::reject(res).await);
        }

        let created = res.json::<WireTask>().await?;
        Ok(created.into())
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<(), RepositoryError> {
        let mut body = serde_json::Map::new();
        if let Some(text) = &patch.text {
            body.insert("text".to_string(), json!(text));
        }
        if let Some(done) = patch.done {
            body.insert("done".to_string(), json!(done));
        }
        if let Some(priority) = patch.priority {
            body.insert("priority".to_string(), json!(priority));
        }
        if let Some(tag) = patch.tag {
            body.insert("tag".to_string(), json!(tag));
        }
        if let Some(due_date) = patch.due_date {
            // An explicit null clears the date on the service side.
            body.insert("dueDate".to_string(), json!(due_date));
        }

        let res = self
            .client
            .patch(self.task_url(id))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Self::reject(res).await);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let res = self
            .client
            .delete(self.task_url(id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Self::reject(res).await);
        }
        Ok(())
    }
}
