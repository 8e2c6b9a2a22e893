mod paging_config;
pub use paging_config::PagingConfig;
pub use paging_config::TagsPaging;

mod listing_config;
pub use listing_config::ListingConfig;
pub use listing_config::StorageConfig;
