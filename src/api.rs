use actix_web::{delete, get, post, put, routes, web, HttpResponse};
use tracing::{error, info, warn};

use crate::db::{RepositoryError, TodoRepository};
use crate::dto::{parse_todo_id, ErrorMessage, TodoCreated, TodoDto, TodoList, TodoPayload};
use crate::model::Todo;
use crate::Response;

#[routes]
#[get("")]
#[get("/")]
pub async fn fetch_todos(db: web::Data<dyn TodoRepository>) -> HttpResponse {
    match db.list().await {
        Ok(todos) => HttpResponse::Ok().json(TodoList {
            data: todos.iter().map(TodoDto::from).collect(),
        }),
        Err(err) => repository_failure(err, "Failed to fetch todo"),
    }
}

#[routes]
#[post("")]
#[post("/")]
pub async fn create_todo(db: web::Data<dyn TodoRepository>, body: web::Bytes) -> HttpResponse {
    let payload = match decode_payload(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    if payload.title.is_empty() {
        warn!("rejected todo without a title");
        return bad_request("The title is required");
    }

    let todo = Todo::new(payload.title);
    match db.insert(&todo).await {
        Ok(()) => {
            info!(todo_id = %todo.id, "todo created");
            HttpResponse::Created().json(TodoCreated {
                message: "Todo created successfully".to_string(),
                todo_id: todo.id.to_hex(),
            })
        }
        Err(err) => repository_failure(err, "Failed to save todo"),
    }
}

#[put("/{id}")]
pub async fn update_todo(
    db: web::Data<dyn TodoRepository>,
    id: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let Some(id) = parse_todo_id(&id) else {
        return bad_request("The ID is invalid");
    };
    let payload = match decode_payload(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    if payload.title.is_empty() {
        warn!(todo_id = %id, "rejected update without a title");
        return bad_request("The Title field is required");
    }

    match db.update(id, &payload.title, payload.completed).await {
        Ok(()) => {
            info!(todo_id = %id, completed = payload.completed, "todo updated");
            HttpResponse::Ok().json(Response {
                message: "Todo updated successfully".to_string(),
            })
        }
        Err(err) => repository_failure(err, "Failed to update todo"),
    }
}

#[delete("/{id}")]
pub async fn delete_todo(db: web::Data<dyn TodoRepository>, id: web::Path<String>) -> HttpResponse {
    let Some(id) = parse_todo_id(&id) else {
        return bad_request("The ID is invalid");
    };

    match db.delete(id).await {
        Ok(()) => {
            info!(todo_id = %id, "todo deleted");
            HttpResponse::Ok().json(Response {
                message: "Todo deleted successfully".to_string(),
            })
        }
        Err(err) => repository_failure(err, "Failed to delete todo"),
    }
}

fn decode_payload(body: &[u8]) -> Result<TodoPayload, HttpResponse> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "rejected malformed request body");
        HttpResponse::BadRequest().json(ErrorMessage {
            message: "Invalid request body".to_string(),
            error: err.to_string(),
        })
    })
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(Response {
        message: message.to_string(),
    })
}

fn repository_failure(err: RepositoryError, message: &str) -> HttpResponse {
    match err {
        RepositoryError::NotFound(id) => {
            warn!(todo_id = %id, "todo not found");
            HttpResponse::NotFound().json(Response {
                message: "Todo not found".to_string(),
            })
        }
        RepositoryError::Database(err) => {
            error!(error = %err, "{}", message);
            HttpResponse::InternalServerError().json(ErrorMessage {
                message: message.to_string(),
                error: err.to_string(),
            })
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/todo")
            .service(fetch_todos)
            .service(create_todo)
            .service(update_todo)
            .service(delete_todo),
    );
}
