//! The remote resource as the store sees it.
//!
//! `TodoApi` is the narrow async seam the store depends on. `HttpTodoApi`
//! is the production implementation: it pairs the stateless `TodoClient`
//! with a `Transport`, so every call is build → execute → parse.

use async_trait::async_trait;

use crate::client::TodoClient;
use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, Filters, Todo, TodoId, TodoPage, UpdateTodo};

#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self, filters: &Filters) -> Result<TodoPage, ApiError>;
    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError>;
    async fn get(&self, id: TodoId) -> Result<Todo, ApiError>;
    async fn update(&self, id: TodoId, input: &UpdateTodo) -> Result<Todo, ApiError>;
    async fn delete(&self, id: TodoId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpTodoApi<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> HttpTodoApi<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }
}

impl HttpTodoApi<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            TodoClient::new(&config.base_url),
            ReqwestTransport::new(config)?,
        ))
    }
}

#[async_trait]
impl<T: Transport> TodoApi for HttpTodoApi<T> {
    async fn list(&self, filters: &Filters) -> Result<TodoPage, ApiError> {
        let request = self.client.build_list_todos(filters)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_list_todos(response)
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_todo(response)
    }

    async fn get(&self, id: TodoId) -> Result<Todo, ApiError> {
        let response = self.transport.execute(self.client.build_get_todo(id)).await?;
        self.client.parse_get_todo(response)
    }

    async fn update(&self, id: TodoId, input: &UpdateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(id, input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_todo(response)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }
}
