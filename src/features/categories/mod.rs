pub mod dtos;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod tree;

pub use services::CategoryService;
