use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

const TITLE_MAX_LEN: usize = 100;
const DESCRIPTION_MAX_LEN: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Title,
    Description,
    Completed,
    #[default]
    CreatedAt,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub filter: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub data: Vec<Todo>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type Failure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    todos: Vec<Todo>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn check_title(title: &str) -> Result<(), Failure> {
    if title.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "title is required"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(failure(StatusCode::BAD_REQUEST, "title is too long"));
    }
    Ok(())
}

fn check_description(description: Option<&str>) -> Result<(), Failure> {
    match description {
        Some(d) if d.chars().count() > DESCRIPTION_MAX_LEN => {
            Err(failure(StatusCode::BAD_REQUEST, "description is too long"))
        }
        _ => Ok(()),
    }
}

fn matches_filter(todo: &Todo, needle: &str) -> bool {
    todo.title.to_lowercase().contains(needle)
        || todo
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

fn sort_todos(todos: &mut [Todo], field: SortField, order: SortOrder) {
    todos.sort_by(|a, b| {
        let by_field = match field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Completed => a.completed.cmp(&b.completed),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let ordering = by_field.then(a.id.cmp(&b.id));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

async fn list_todos(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TodoList>, Failure> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    if page == 0 || limit == 0 {
        return Err(failure(StatusCode::BAD_REQUEST, "page and limit must be positive"));
    }

    let needle = query.filter.unwrap_or_default().trim().to_lowercase();
    let mut todos: Vec<Todo> = db
        .read()
        .await
        .todos
        .iter()
        .filter(|t| needle.is_empty() || matches_filter(t, &needle))
        .cloned()
        .collect();
    sort_todos(
        &mut todos,
        query.sort.unwrap_or_default(),
        query.order.unwrap_or_default(),
    );

    let total = todos.len() as u64;
    let total_pages = total.div_ceil(u64::from(limit)) as u32;
    let data = todos
        .into_iter()
        .skip((page as usize - 1) * limit as usize)
        .take(limit as usize)
        .collect();

    Ok(Json(TodoList {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages,
        },
    }))
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), Failure> {
    check_title(&input.title)?;
    check_description(input.description.as_deref())?;

    let mut store = db.write().await;
    store.next_id += 1;
    let todo = Todo {
        id: store.next_id,
        title: input.title,
        description: input.description,
        completed: input.completed,
        created_at: Utc::now(),
    };
    store.todos.push(todo.clone());
    info!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    let store = db.read().await;
    store
        .todos
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, Failure> {
    if let Some(title) = &input.title {
        check_title(title)?;
    }
    check_description(input.description.as_deref())?;

    let mut store = db.write().await;
    let todo = store
        .todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "todo not found"))?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = Some(description);
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let before = store.todos.len();
    store.todos.retain(|t| t.id != id);
    if store.todos.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    info!(id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn todo(id: u64, title: &str, completed: bool) -> Todo {
        Todo {
            id,
            title: title.to_string(),
            description: None,
            completed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, id as u32).unwrap(),
        }
    }

    #[test]
    fn todo_serializes_to_camel_case_json() {
        let json = serde_json::to_value(todo(1, "Test", false)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["completed"], false);
        assert_eq!(json["createdAt"], "2024-01-01T00:00:01Z");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn create_todo_defaults_completed_to_false() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No completed field"}"#).unwrap();
        assert_eq!(input.title, "No completed field");
        assert!(!input.completed);
        assert!(input.description.is_none());
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn sort_desc_breaks_ties_by_newest_id() {
        let mut todos = vec![todo(1, "b", false), todo(2, "a", false), todo(3, "a", true)];
        sort_todos(&mut todos, SortField::Title, SortOrder::Desc);
        let ids: Vec<_> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        sort_todos(&mut todos, SortField::CreatedAt, SortOrder::Asc);
        let ids: Vec<_> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn filter_matches_title_or_description_case_insensitively() {
        let mut with_description = todo(1, "Groceries", false);
        with_description.description = Some("Buy MILK".to_string());
        assert!(matches_filter(&with_description, "milk"));
        assert!(matches_filter(&with_description, "groc"));
        assert!(!matches_filter(&todo(2, "Walk dog", false), "milk"));
    }
}
