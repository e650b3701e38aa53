use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::db::{RepositoryError, TodoRepository};
use crate::model::Todo;

/// In-memory [`TodoRepository`] for handler tests. With `failing` set every
/// call reports a database error.
#[derive(Default)]
pub struct FakeTodoRepository {
    pub todos: Arc<Mutex<Vec<Todo>>>,
    pub failing: bool,
}

impl FakeTodoRepository {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Vec<Todo> {
        self.todos.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing {
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
            return Err(RepositoryError::Database(io.into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for FakeTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, RepositoryError> {
        self.check()?;
        Ok(self.snapshot())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), RepositoryError> {
        self.check()?;
        self.todos.lock().unwrap().push(todo.clone());
        Ok(())
    }

    async fn update(&self, id: ObjectId, title: &str, completed: bool) -> Result<(), RepositoryError> {
        self.check()?;
        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        todo.title = title.to_string();
        todo.completed = completed;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), RepositoryError> {
        self.check()?;
        let mut todos = self.todos.lock().unwrap();
        let index = todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        todos.remove(index);
        Ok(())
    }
}
