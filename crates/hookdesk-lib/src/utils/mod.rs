// Utility functions module

pub mod database;
pub mod paths;
pub mod schema;
pub mod store;
pub mod text;
