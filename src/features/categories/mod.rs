pub mod dtos;
pub mod handlers;
pub mod models;
pub mod ordering;
pub mod payload;
pub mod routes;
pub mod services;
pub mod store;
pub mod tree;

pub use services::CategoryService;
pub use store::CategoryStore;
