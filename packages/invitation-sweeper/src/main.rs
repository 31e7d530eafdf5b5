use aws_lambda_events::event::cloudwatch_events::CloudWatchEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::info;

use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::repositories::invitation_repository::DynamoDbInvitationRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::repositories::websocket_repository::DynamoDbWebSocketRepository;
use shared::services::game_service::GameService;
use shared::services::invitation_service::InvitationService;
use shared::services::notification_service::NotificationService;
use shared::sync::EntityLocks;
use shared::time::SystemTimeSource;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let config = aws_config::load_from_env().await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);

    let websocket_endpoint = std::env::var("WEBSOCKET_API_ENDPOINT")
        .expect("WEBSOCKET_API_ENDPOINT environment variable must be set");
    let api_gateway_config = aws_sdk_apigatewaymanagement::config::Builder::from(&config)
        .endpoint_url(websocket_endpoint)
        .build();
    let api_gateway_client = aws_sdk_apigatewaymanagement::Client::from_conf(api_gateway_config);

    let websocket_repository = Arc::new(DynamoDbWebSocketRepository::new(
        dynamodb_client.clone(),
        api_gateway_client,
    ));
    let notifications = NotificationService::new(websocket_repository);

    let time = Arc::new(SystemTimeSource);
    let locks = Arc::new(EntityLocks::new());

    let user_repository = Arc::new(DynamoDbUserRepository::new(dynamodb_client.clone()));
    let game_repository = Arc::new(DynamoDbGameRepository::new(dynamodb_client.clone()));
    let invitation_repository = Arc::new(DynamoDbInvitationRepository::new(dynamodb_client));

    let game_service = Arc::new(GameService::new(
        game_repository,
        user_repository.clone(),
        time.clone(),
        locks.clone(),
        notifications.clone(),
    ));
    let invitation_service = Arc::new(InvitationService::new(
        invitation_repository,
        user_repository,
        game_service,
        time,
        locks,
        notifications,
    ));

    run(service_fn(move |_event: LambdaEvent<CloudWatchEvent>| {
        let invitation_service = invitation_service.clone();
        async move {
            let swept = invitation_service.sweep_expired().await?;
            info!("sweep finished, {} invitations expired", swept);
            Ok::<(), Error>(())
        }
    }))
    .await
}
