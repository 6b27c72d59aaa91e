//! Async task API: `TaskClient` requests executed over a `Transport`.
//!
//! Every call is exactly one outbound request. Nothing here retries or
//! caches; retry policy belongs to the store.

use async_trait::async_trait;
use tracing::{error, warn};

use crate::client::TaskClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::{DeleteConfirmation, NewTask, RootInfo, Task, TaskFilter};

/// Remote task operations the store depends on.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, ApiError>;

    async fn get(&self, id: i64) -> Result<Task, ApiError>;

    async fn create(&self, task: NewTask) -> Result<Task, ApiError>;

    /// Full replacement of the task's state.
    async fn update(&self, id: i64, task: NewTask) -> Result<Task, ApiError>;

    async fn delete(&self, id: i64) -> Result<DeleteConfirmation, ApiError>;

    async fn complete(&self, id: i64) -> Result<Task, ApiError>;

    async fn uncomplete(&self, id: i64) -> Result<Task, ApiError>;
}

pub struct TaskApi<T: Transport = ReqwestTransport> {
    client: TaskClient,
    transport: T,
}

impl TaskApi<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            TaskClient::new(&config.base_url),
            ReqwestTransport::new(config.timeout)?,
        ))
    }
}

impl<T: Transport> TaskApi<T> {
    pub fn new(client: TaskClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TaskClient {
        &self.client
    }

    /// `GET /`: service banner, useful as a readiness check.
    pub async fn root(&self) -> Result<RootInfo, ApiError> {
        let response = self.send(self.client.build_root()).await?;
        self.observe(self.client.parse_root(response))
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        self.transport.execute(request).await.map_err(|err| {
            match &err {
                ApiError::Network(msg) => warn!(method, %path, "network error: {msg}"),
                _ => error!(method, %path, "request error: {err}"),
            }
            err
        })
    }

    fn observe<R>(&self, result: Result<R, ApiError>) -> Result<R, ApiError> {
        if let Err(err) = &result {
            match err.payload() {
                Some(payload) => warn!(status = ?err.status(), %payload, "api error: {err}"),
                None => warn!(status = ?err.status(), "api error: {err}"),
            }
        }
        result
    }
}

#[async_trait]
impl<T: Transport> TaskService for TaskApi<T> {
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, ApiError> {
        let response = self.send(self.client.build_list_tasks(&filter)).await?;
        self.observe(self.client.parse_list_tasks(response))
    }

    async fn get(&self, id: i64) -> Result<Task, ApiError> {
        let response = self.send(self.client.build_get_task(id)).await?;
        self.observe(self.client.parse_get_task(response))
    }

    async fn create(&self, task: NewTask) -> Result<Task, ApiError> {
        let request = self.client.build_create_task(&task)?;
        let response = self.send(request).await?;
        self.observe(self.client.parse_create_task(response))
    }

    async fn update(&self, id: i64, task: NewTask) -> Result<Task, ApiError> {
        let request = self.client.build_update_task(id, &task)?;
        let response = self.send(request).await?;
        self.observe(self.client.parse_update_task(response))
    }

    async fn delete(&self, id: i64) -> Result<DeleteConfirmation, ApiError> {
        let response = self.send(self.client.build_delete_task(id)).await?;
        self.observe(self.client.parse_delete_task(response))
    }

    async fn complete(&self, id: i64) -> Result<Task, ApiError> {
        let response = self.send(self.client.build_complete_task(id)).await?;
        self.observe(self.client.parse_complete_task(response))
    }

    async fn uncomplete(&self, id: i64) -> Result<Task, ApiError> {
        let response = self.send(self.client.build_uncomplete_task(id)).await?;
        self.observe(self.client.parse_uncomplete_task(response))
    }
}
