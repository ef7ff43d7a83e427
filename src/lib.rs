#![doc = "The `taskkeeper` library crate."]
#![doc = ""]
#![doc = "A private, per-user task tracker: credential hashing, bearer-token issuance and"]
#![doc = "validation, request identity resolution, and an owner-scoped task repository with"]
#![doc = "filtering, sorting and pagination, exposed over actix-web."]
#![doc = "The binary (`main.rs`) wires these together and runs the server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;
