pub mod auth_service;
pub mod clock_service;
pub mod errors;
pub mod game_service;
pub mod invitation_service;
pub mod notification_service;
