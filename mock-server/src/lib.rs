use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: i32,
}

/// Incoming create/replace payload. Any `id` in the body is ignored.
#[derive(Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    1
}

#[derive(Deserialize)]
pub struct ListParams {
    pub completed: Option<bool>,
    pub priority: Option<i32>,
}

/// Insertion-ordered so listings come back in a stable order.
pub type Db = Arc<RwLock<Vec<Task>>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn seed_tasks() -> Vec<Task> {
    let seed = [
        (1, "Learn axum", "Work through the routing guide", false, 2),
        (2, "Build the task store", "Fetch with retry and confirm-then-apply writes", true, 3),
        (3, "Package the desktop app", "Bundle the backend with the shell", false, 1),
    ];
    seed.into_iter()
        .map(|(id, title, description, completed, priority)| Task {
            id: Some(id),
            title: title.to_string(),
            description: Some(description.to_string()),
            completed,
            priority,
        })
        .collect()
}

pub fn app() -> Router {
    app_with(seed_tasks())
}

pub fn app_with(tasks: Vec<Task>) -> Router {
    let db: Db = Arc::new(RwLock::new(tasks));
    Router::new()
        .route("/", get(root))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/complete", patch(complete_task))
        .route("/tasks/{id}/uncomplete", patch(uncomplete_task))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, seed_tasks()).await
}

pub async fn run_with(listener: TcpListener, tasks: Vec<Task>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(tasks)).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "task not found" })),
    )
}

fn position(tasks: &[Task], id: i64) -> ApiResult<usize> {
    tasks
        .iter()
        .position(|task| task.id == Some(id))
        .ok_or_else(not_found)
}

async fn root(State(db): State<Db>) -> Json<Value> {
    let total = db.read().await.len();
    Json(json!({ "message": "task service API", "total_tasks": total }))
}

async fn list_tasks(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Task>> {
    let tasks = db.read().await;
    Json(
        tasks
            .iter()
            .filter(|task| params.completed.map_or(true, |c| task.completed == c))
            .filter(|task| params.priority.map_or(true, |p| task.priority == p))
            .cloned()
            .collect(),
    )
}

async fn get_task(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Task>> {
    let tasks = db.read().await;
    let index = position(&tasks, id)?;
    Ok(Json(tasks[index].clone()))
}

/// Answers 200 with the stored task, including its newly assigned id.
async fn create_task(State(db): State<Db>, Json(input): Json<TaskInput>) -> Json<Task> {
    let mut tasks = db.write().await;
    let next_id = tasks.iter().filter_map(|task| task.id).max().unwrap_or(0) + 1;
    let task = Task {
        id: Some(next_id),
        title: input.title,
        description: input.description,
        completed: input.completed,
        priority: input.priority,
    };
    tasks.push(task.clone());
    tracing::info!(id = next_id, "created task");
    Json(task)
}

async fn update_task(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<Task>> {
    let mut tasks = db.write().await;
    let index = position(&tasks, id)?;
    tasks[index] = Task {
        id: Some(id),
        title: input.title,
        description: input.description,
        completed: input.completed,
        priority: input.priority,
    };
    Ok(Json(tasks[index].clone()))
}

async fn delete_task(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let mut tasks = db.write().await;
    let index = position(&tasks, id)?;
    tasks.remove(index);
    tracing::info!(id, "deleted task");
    Ok(Json(json!({ "message": "task deleted" })))
}

async fn complete_task(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Task>> {
    set_completed(&db, id, true).await
}

async fn uncomplete_task(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Task>> {
    set_completed(&db, id, false).await
}

async fn set_completed(db: &Db, id: i64, completed: bool) -> ApiResult<Json<Task>> {
    let mut tasks = db.write().await;
    let index = position(&tasks, id)?;
    tasks[index].completed = completed;
    Ok(Json(tasks[index].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_to_json() {
        let task = Task {
            id: Some(1),
            title: "Test".to_string(),
            description: None,
            completed: false,
            priority: 2,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["description"], Value::Null);
        assert_eq!(json["completed"], false);
        assert_eq!(json["priority"], 2);
    }

    #[test]
    fn input_applies_defaults() {
        let input: TaskInput = serde_json::from_str(r#"{"title":"Bare"}"#).unwrap();
        assert_eq!(input.title, "Bare");
        assert!(input.description.is_none());
        assert!(!input.completed);
        assert_eq!(input.priority, 1);
    }

    #[test]
    fn input_ignores_client_id() {
        let input: TaskInput =
            serde_json::from_str(r#"{"id":99,"title":"Mine","priority":3}"#).unwrap();
        assert_eq!(input.title, "Mine");
        assert_eq!(input.priority, 3);
    }

    #[test]
    fn input_rejects_missing_title() {
        let result: Result<TaskInput, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn seed_has_unique_ids() {
        let seed = seed_tasks();
        assert_eq!(seed.len(), 3);
        let ids: Vec<_> = seed.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }
}
