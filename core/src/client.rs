//! Stateless HTTP request builder and response parser for the task API.
//!
//! # Design
//! `TaskClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Whoever executes the round-trip in between (see `TaskApi`) owns the I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DeleteConfirmation, NewTask, RootInfo, Task, TaskFilter};

/// Synchronous, stateless client for the task API.
#[derive(Debug, Clone)]
pub struct TaskClient {
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_root(&self) -> HttpRequest {
        self.bodyless(HttpMethod::Get, "/")
    }

    pub fn build_list_tasks(&self, filter: &TaskFilter) -> HttpRequest {
        self.bodyless(HttpMethod::Get, &format!("/tasks{}", filter.to_query()))
    }

    pub fn build_get_task(&self, id: i64) -> HttpRequest {
        self.bodyless(HttpMethod::Get, &format!("/tasks/{id}"))
    }

    pub fn build_create_task(&self, input: &NewTask) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/tasks", input)
    }

    pub fn build_update_task(&self, id: i64, input: &NewTask) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, &format!("/tasks/{id}"), input)
    }

    pub fn build_delete_task(&self, id: i64) -> HttpRequest {
        self.bodyless(HttpMethod::Delete, &format!("/tasks/{id}"))
    }

    pub fn build_complete_task(&self, id: i64) -> HttpRequest {
        self.bodyless(HttpMethod::Patch, &format!("/tasks/{id}/complete"))
    }

    pub fn build_uncomplete_task(&self, id: i64) -> HttpRequest {
        self.bodyless(HttpMethod::Patch, &format!("/tasks/{id}/uncomplete"))
    }

    pub fn parse_root(&self, response: HttpResponse) -> Result<RootInfo, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<DeleteConfirmation, ApiError> {
        parse_json(response)
    }

    pub fn parse_complete_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response)
    }

    pub fn parse_uncomplete_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_json(response)
    }

    fn bodyless(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Any 2xx is success; everything else becomes a status error.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::from_status(response.status, &response.body))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(ApiError::decode)
}
