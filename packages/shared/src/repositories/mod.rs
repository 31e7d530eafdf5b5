pub mod errors;
pub mod game_repository;
pub mod invitation_repository;
pub mod user_repository;
pub mod websocket_repository;
