use serde::{Deserialize, Serialize};

/// Default page size when `n` is absent or invalid,
///
const DEFAULT_PAGE_SIZE: usize = 100;

/// Query page size parameter name,
///
const SIZE_PARAMETER_NAME: &'static str = "n";

/// Query cursor parameter name,
///
const CURSOR_PARAMETER_NAME: &'static str = "last";

/// Settings that control how list endpoints paginate,
///
/// Example:
///
/// ```toml
/// [paging]
/// default_page_size = 100
/// max_page_size = 1000
/// size_parameter = "n"
/// cursor_parameter = "last"
/// tags_paging = "on_demand"
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Page size used when the request does not carry a usable one,
    ///
    pub default_page_size: usize,
    /// If set, requests asking for more than this many results are rejected,
    ///
    pub max_page_size: Option<usize>,
    /// Name of the page size query parameter,
    ///
    pub size_parameter: String,
    /// Name of the cursor query parameter,
    ///
    pub cursor_parameter: String,
    /// When the tags endpoint applies pagination,
    ///
    pub tags_paging: TagsPaging,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
            size_parameter: SIZE_PARAMETER_NAME.to_string(),
            cursor_parameter: CURSOR_PARAMETER_NAME.to_string(),
            tags_paging: TagsPaging::default(),
        }
    }
}

/// Pagination policy of the tags endpoint,
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagsPaging {
    /// Only paginate when the request carries a size or cursor parameter,
    ///
    #[default]
    OnDemand,
    /// Always paginate, same as the catalog endpoint,
    ///
    Always,
}
