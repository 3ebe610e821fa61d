pub mod directory_service;
pub mod directory_service_impl;

pub use directory_service::{DirectoryError, DirectoryService, HistoryRequest};
pub use directory_service_impl::InMemoryDirectoryService;
