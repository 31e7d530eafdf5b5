#[derive(Debug)]
pub enum InvitationRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for InvitationRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            InvitationRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for InvitationRepositoryError {}
