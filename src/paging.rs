mod page_request;
pub use page_request::PageRequest;
pub use page_request::PagingParameters;

mod result_window;
pub use result_window::page_filter;
pub use result_window::ResultWindow;

mod link;
