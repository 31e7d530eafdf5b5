use async_trait::async_trait;
use aws_sdk_apigatewaymanagement::{primitives::Blob, Client as ApiGatewayClient};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use serde_dynamo::to_attribute_value;
use std::env;

#[cfg(test)]
use mockall::automock;

/// Read side of the connection registry plus the push channel. Storing
/// connections on connect/disconnect belongs to the WebSocket entry
/// point, which lives outside this core.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebSocketRepository: Send + Sync {
    async fn get_connection_id(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub struct DynamoDbWebSocketRepository {
    dynamodb_client: DynamoDbClient,
    api_gateway_client: ApiGatewayClient,
    table_name: String,
}

impl DynamoDbWebSocketRepository {
    pub fn new(dynamodb_client: DynamoDbClient, api_gateway_client: ApiGatewayClient) -> Self {
        let table_name = env::var("PLAYER_CONNECTIONS_TABLE")
            .expect("PLAYER_CONNECTIONS_TABLE environment variable must be set");

        Self {
            dynamodb_client,
            api_gateway_client,
            table_name,
        }
    }
}

#[async_trait]
impl WebSocketRepository for DynamoDbWebSocketRepository {
    async fn get_connection_id(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let output = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", to_attribute_value(user_id)?)
            .send()
            .await?;

        let connection_id = output
            .item
            .and_then(|item| item.get("connection_id").cloned())
            .and_then(|value| value.as_s().ok().cloned());

        Ok(connection_id)
    }

    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.api_gateway_client
            .post_to_connection()
            .connection_id(connection_id)
            .data(Blob::new(message.as_bytes()))
            .send()
            .await?;

        Ok(())
    }
}
