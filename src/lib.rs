pub mod analysis;
pub mod config;
pub mod csv_store;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod generate;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod schema;
pub mod server;
pub mod services;
pub mod state;
pub mod verify;
