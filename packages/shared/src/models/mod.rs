pub mod auth;
pub mod game;
pub mod invitation;
pub mod user;
