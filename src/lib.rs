mod error;
pub use error::Error;
pub use error::ErrorCode;
pub use error::Errors;
pub use error::RegistryError;

mod config;
pub use config::ListingConfig;
pub use config::PagingConfig;
pub use config::StorageConfig;
pub use config::TagsPaging;

mod paging;
pub use paging::page_filter;
pub use paging::PageRequest;
pub use paging::PagingParameters;
pub use paging::ResultWindow;

pub mod storage;
pub use storage::FilesystemStore;
pub use storage::MemoryStore;

pub mod enumeration;
pub use enumeration::Enumeration;

mod listing;
pub use listing::Listing;
pub use listing::JSON_CONTENT_TYPE;

mod catalog;
pub use catalog::catalog_api;
pub use catalog::CatalogLister;
pub use catalog::CatalogResponse;

mod tags;
pub use tags::tags_api;
pub use tags::validate_repository_name;
pub use tags::TagLister;
pub use tags::TagsResponse;

mod app;
pub use app::ListingApp;
