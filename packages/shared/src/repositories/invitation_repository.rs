use crate::models::invitation::Invitation;
use crate::repositories::errors::invitation_repository_errors::InvitationRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use serde_dynamo::{from_item, from_items, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbInvitationRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbInvitationRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("INVITATIONS_TABLE")
            .expect("INVITATIONS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create_invitation(
        &self,
        invitation: &Invitation,
    ) -> Result<(), InvitationRepositoryError>;

    async fn get_invitation(
        &self,
        invitation_id: &str,
    ) -> Result<Option<Invitation>, InvitationRepositoryError>;

    async fn update_invitation(
        &self,
        invitation: &Invitation,
    ) -> Result<(), InvitationRepositoryError>;

    /// A pending invitation for the ordered (sender, recipient) pair,
    /// if one exists.
    async fn find_pending_between(
        &self,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<Option<Invitation>, InvitationRepositoryError>;

    /// How many invitations the sender has created for this recipient
    /// since the given instant, regardless of status.
    async fn count_sent_between_since(
        &self,
        sender_id: &str,
        recipient_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, InvitationRepositoryError>;

    async fn list_pending_for(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError>;

    async fn list_pending_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError>;
}

#[async_trait]
impl InvitationRepository for DynamoDbInvitationRepository {
    async fn create_invitation(
        &self,
        invitation: &Invitation,
    ) -> Result<(), InvitationRepositoryError> {
        let item = to_item(invitation)
            .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| InvitationRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_invitation(
        &self,
        invitation_id: &str,
    ) -> Result<Option<Invitation>, InvitationRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "id",
                to_attribute_value(invitation_id)
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| InvitationRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let invitation: Invitation = from_item(item)
                .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(invitation))
        } else {
            Ok(None)
        }
    }

    async fn update_invitation(
        &self,
        invitation: &Invitation,
    ) -> Result<(), InvitationRepositoryError> {
        let item = to_item(invitation)
            .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|e| InvitationRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn find_pending_between(
        &self,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<Option<Invitation>, InvitationRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_InvitationBySender")
            .key_condition_expression("sender_id = :sender_id")
            .filter_expression("recipient_id = :recipient_id AND #status = :pending")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(
                ":sender_id",
                to_attribute_value(sender_id)
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .expression_attribute_values(
                ":recipient_id",
                to_attribute_value(recipient_id)
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .expression_attribute_values(
                ":pending",
                to_attribute_value("PENDING")
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| InvitationRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.items.and_then(|items| items.into_iter().next()) {
            let invitation: Invitation = from_item(item)
                .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(invitation))
        } else {
            Ok(None)
        }
    }

    async fn count_sent_between_since(
        &self,
        sender_id: &str,
        recipient_id: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, InvitationRepositoryError> {
        // created_at is stored as an RFC 3339 UTC string, so range
        // comparison on the sort key works lexicographically.
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_InvitationBySender")
            .key_condition_expression("sender_id = :sender_id AND created_at >= :since")
            .filter_expression("recipient_id = :recipient_id")
            .expression_attribute_values(
                ":sender_id",
                to_attribute_value(sender_id)
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .expression_attribute_values(
                ":since",
                to_attribute_value(since)
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .expression_attribute_values(
                ":recipient_id",
                to_attribute_value(recipient_id)
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| InvitationRepositoryError::DynamoDb(e.to_string()))?;

        Ok(output.items.map_or(0, |items| items.len()))
    }

    async fn list_pending_for(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_InvitationByRecipient")
            .key_condition_expression("recipient_id = :recipient_id")
            .filter_expression("#status = :pending")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(
                ":recipient_id",
                to_attribute_value(recipient_id)
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .expression_attribute_values(
                ":pending",
                to_attribute_value("PENDING")
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| InvitationRepositoryError::DynamoDb(e.to_string()))?;

        let items = output.items.unwrap_or_default();
        from_items(items).map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))
    }

    async fn list_pending_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError> {
        // Sweep path. Pending invitations are few and short-lived, so a
        // filtered scan is acceptable here.
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#status = :pending AND expires_at <= :cutoff")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(
                ":pending",
                to_attribute_value("PENDING")
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .expression_attribute_values(
                ":cutoff",
                to_attribute_value(cutoff)
                    .map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| InvitationRepositoryError::DynamoDb(e.to_string()))?;

        let items = output.items.unwrap_or_default();
        from_items(items).map_err(|e| InvitationRepositoryError::Serialization(e.to_string()))
    }
}
