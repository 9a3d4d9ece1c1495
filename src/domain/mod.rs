pub mod auth;
pub mod category;
pub mod classify;
pub mod health;
pub mod inference;
pub mod lenient;
pub mod location;
pub mod session;
pub mod settings;
pub mod stats;
