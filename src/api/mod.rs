pub mod client;
pub mod envelope;
pub mod query;
pub mod roles;
pub mod users;
