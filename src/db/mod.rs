//! Persistent store collaborator

pub mod store;

pub use store::DashboardDatabase;
