pub mod build;
pub mod store;
