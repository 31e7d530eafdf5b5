use axum::{routing::get, Router};
use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::repositories::invitation_repository::DynamoDbInvitationRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::repositories::websocket_repository::DynamoDbWebSocketRepository;
use shared::services::auth_service::AuthService;
use shared::services::game_service::GameService;
use shared::services::invitation_service::InvitationService;
use shared::services::notification_service::NotificationService;
use shared::sync::EntityLocks;
use shared::time::SystemTimeSource;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

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
        game_service.clone(),
        time,
        locks,
        notifications,
    ));
    let auth_service = Arc::new(AuthService::new());

    let app_state = state::AppState {
        game_service,
        invitation_service,
        auth_service,
    };

    // Configure CORS
    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::games::routes())
        .merge(routes::invitations::routes())
        .layer(cors)
        .with_state(app_state);

    run(app).await
}
