pub mod core {
    pub mod auth;
    pub mod config;
    pub mod error;
    pub mod messages;
    pub mod routes;
    pub mod state;
    pub mod tracing_init;
}

pub mod api;
pub mod models;
pub mod security;
pub mod stores;
pub mod validation;
pub mod views;
