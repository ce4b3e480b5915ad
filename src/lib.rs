pub mod error;
pub mod host;
pub mod models;
pub mod repositories;
pub mod services;
pub mod settings;
pub mod terminal;
