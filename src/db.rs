use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::{options::ClientOptions, Client, Collection};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::model::Todo;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("todo {0} not found")]
    NotFound(ObjectId),
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

/// Storage operations the HTTP handlers depend on.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Every stored item, in storage order.
    async fn list(&self) -> Result<Vec<Todo>, RepositoryError>;

    async fn insert(&self, todo: &Todo) -> Result<(), RepositoryError>;

    /// Rewrites `title` and `completed`, leaving `_id` and `createdAt` alone.
    /// Fails with [`RepositoryError::NotFound`] when no item has `id`.
    async fn update(&self, id: ObjectId, title: &str, completed: bool) -> Result<(), RepositoryError>;

    /// Fails with [`RepositoryError::NotFound`] when no item has `id`.
    async fn delete(&self, id: ObjectId) -> Result<(), RepositoryError>;
}

#[derive(Clone, Debug)]
pub struct MongoDbClient {
    client: Client,
    database: String,
    collection: String,
}

impl MongoDbClient {
    /// Connects and pings the server, so an unreachable database surfaces
    /// here rather than on the first request.
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let client_options = ClientOptions::parse(&config.mongodb_uri).await?;
        let client = Client::with_options(client_options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        info!(database = %config.database, collection = %config.collection, "connected to MongoDB");
        Ok(Self {
            client,
            database: config.database.clone(),
            collection: config.collection.clone(),
        })
    }

    fn get_todo_collection(&self) -> Collection<Todo> {
        let db = self.client.database(&self.database);
        db.collection(&self.collection)
    }
}

#[async_trait]
impl TodoRepository for MongoDbClient {
    async fn list(&self) -> Result<Vec<Todo>, RepositoryError> {
        let mut cursor = self.get_todo_collection().find(None, None).await?;
        let mut result: Vec<Todo> = Vec::new();
        while cursor.advance().await? {
            result.push(cursor.deserialize_current()?);
        }
        debug!(count = result.len(), "fetched todos");
        Ok(result)
    }

    async fn insert(&self, todo: &Todo) -> Result<(), RepositoryError> {
        self.get_todo_collection().insert_one(todo, None).await?;
        Ok(())
    }

    async fn update(&self, id: ObjectId, title: &str, completed: bool) -> Result<(), RepositoryError> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": { "title": title, "completed": completed } };
        let result = self
            .get_todo_collection()
            .update_one(filter, update, None)
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), RepositoryError> {
        let filter = doc! { "_id": id };
        let result = self.get_todo_collection().delete_one(filter, None).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testcontainers::core::{IntoContainerPort, WaitFor};
    use testcontainers::runners::AsyncRunner;
    use testcontainers::{ContainerAsync, GenericImage};

    async fn start_mongo() -> (ContainerAsync<GenericImage>, MongoDbClient) {
        let node = GenericImage::new("mongo", "6.0.7")
            .with_exposed_port(27017.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
            .start()
            .await
            .unwrap();
        let port = node.get_host_port_ipv4(27017).await.unwrap();
        let config = Config::new_mongodb_uri(format!("mongodb://localhost:{}", port));
        let client = MongoDbClient::new(&config).await.unwrap();
        (node, client)
    }

    #[actix_web::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_insert_and_list() {
        let (_node, client) = start_mongo().await;
        assert!(client.list().await.unwrap().is_empty());

        let todo = Todo::new("Buy milk".to_string());
        client.insert(&todo).await.unwrap();

        let todos = client.list().await.unwrap();
        assert_eq!(todos, vec![todo]);
    }

    #[actix_web::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_update_keeps_created_at() {
        let (_node, client) = start_mongo().await;
        let todo = Todo::new("Buy milk".to_string());
        client.insert(&todo).await.unwrap();

        client.update(todo.id, "Buy oat milk", true).await.unwrap();
        client.update(todo.id, "Buy oat milk", true).await.unwrap();

        let todos = client.list().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Buy oat milk");
        assert!(todos[0].completed);
        assert_eq!(todos[0].created_at, todo.created_at);
    }

    #[actix_web::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_missing_id_is_not_found() {
        let (_node, client) = start_mongo().await;
        let id = ObjectId::new();

        let result = client.update(id, "Buy milk", false).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(missing)) if missing == id));
        let result = client.delete(id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(missing)) if missing == id));
    }

    #[actix_web::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_delete() {
        let (_node, client) = start_mongo().await;
        let first = Todo::new("Buy milk".to_string());
        let second = Todo::new("Walk the dog".to_string());
        client.insert(&first).await.unwrap();
        client.insert(&second).await.unwrap();

        client.delete(first.id).await.unwrap();

        let todos = client.list().await.unwrap();
        assert_eq!(todos, vec![second]);
    }
}
