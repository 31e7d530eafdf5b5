pub mod models;
pub mod repositories;
pub mod services;
pub mod sync;
pub mod time;
