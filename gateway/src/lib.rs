pub mod auth;
pub mod client;
pub mod error;
pub mod nav;
pub mod notify;
pub mod resources;
