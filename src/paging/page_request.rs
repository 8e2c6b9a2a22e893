use tracing::{event, Level};

use crate::{ErrorCode, PagingConfig, RegistryError};

/// Paging parameters extracted from a request's query,
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Exclusive lower bound, empty means the start of the collection,
    ///
    pub last: String,
    /// Maximum number of entries in the page,
    ///
    pub n: usize,
}

impl PageRequest {
    /// Returns a page request,
    ///
    pub fn new(last: impl Into<String>, n: usize) -> Self {
        Self {
            last: last.into(),
            n,
        }
    }
}

/// Parses paging parameters from request queries w/ a paging config,
///
#[derive(Debug, Clone, Default)]
pub struct PagingParameters {
    config: PagingConfig,
}

impl PagingParameters {
    /// Returns a parser for the given config,
    ///
    pub fn new(config: PagingConfig) -> Self {
        Self { config }
    }

    /// Returns the config,
    ///
    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Extracts paging parameters from a query string,
    ///
    /// A size that is absent, not an integer, or negative falls back to the default page size,
    ///
    pub fn parse(&self, query: Option<&str>) -> PageRequest {
        let pairs = decode(query);

        let last = first(&pairs, &self.config.cursor_parameter)
            .unwrap_or_default()
            .to_string();

        let n = first(&pairs, &self.config.size_parameter)
            .and_then(|n| n.parse::<i64>().ok())
            .filter(|n| *n >= 0)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(self.config.default_page_size);

        PageRequest { last, n }
    }

    /// Returns true if the query carries either paging parameter,
    ///
    pub fn is_enabled(&self, query: Option<&str>) -> bool {
        decode(query).iter().any(|(name, _)| {
            *name == self.config.size_parameter || *name == self.config.cursor_parameter
        })
    }

    /// Rejects page sizes above the configured maximum, if one is set,
    ///
    pub fn check_limit(&self, page: &PageRequest) -> Result<(), RegistryError> {
        match self.config.max_page_size {
            Some(max) if page.n > max => {
                event!(Level::DEBUG, "Page size {} exceeds max {max}", page.n);
                Err(ErrorCode::PaginationNumberInvalid.with_detail(serde_json::json!({
                    "n": page.n,
                    "max": max,
                })))
            }
            _ => Ok(()),
        }
    }
}

fn decode(query: Option<&str>) -> Vec<(String, String)> {
    let query = query.unwrap_or_default();

    match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
        Ok(pairs) => pairs,
        Err(err) => {
            event!(Level::DEBUG, "Ignoring undecodable query {query}, {err}");
            vec![]
        }
    }
}

fn first<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, value)| value.as_str())
}

#[allow(unused_imports)]
#[cfg(test)]
mod tests {
    use crate::{ErrorCode, PageRequest, PagingConfig, PagingParameters};

    #[test]
    fn test_parse_defaults() {
        let params = PagingParameters::default();

        assert_eq!(PageRequest::new("", 100), params.parse(None));
        assert_eq!(PageRequest::new("", 100), params.parse(Some("")));
        assert_eq!(PageRequest::new("", 100), params.parse(Some("n=abc")));
        assert_eq!(PageRequest::new("", 100), params.parse(Some("n=-1")));
        assert_eq!(PageRequest::new("", 100), params.parse(Some("n=")));
        assert_eq!(PageRequest::new("", 100), params.parse(Some("n=1.5")));
        assert_eq!(
            PageRequest::new("", 100),
            params.parse(Some("n=99999999999999999999999"))
        );
    }

    #[test]
    fn test_parse() {
        let params = PagingParameters::default();

        assert_eq!(PageRequest::new("", 0), params.parse(Some("n=0")));
        assert_eq!(PageRequest::new("b", 2), params.parse(Some("n=2&last=b")));
        assert_eq!(PageRequest::new("b", 2), params.parse(Some("last=b&n=2&n=5")));
        assert_eq!(
            PageRequest::new("library/a b", 100),
            params.parse(Some("last=library%2Fa+b"))
        );
        assert_eq!(PageRequest::new("", 7), params.parse(Some("other=x&n=7")));
    }

    #[test]
    fn test_parse_with_config() {
        let params = PagingParameters::new(PagingConfig {
            default_page_size: 10,
            size_parameter: "limit".to_string(),
            cursor_parameter: "after".to_string(),
            ..Default::default()
        });

        assert_eq!(PageRequest::new("", 10), params.parse(Some("n=3&last=b")));
        assert_eq!(PageRequest::new("b", 3), params.parse(Some("limit=3&after=b")));
        assert!(!params.is_enabled(Some("n=3&last=b")));
        assert!(params.is_enabled(Some("after=b")));
    }

    #[test]
    fn test_is_enabled() {
        let params = PagingParameters::default();

        assert!(!params.is_enabled(None));
        assert!(!params.is_enabled(Some("")));
        assert!(!params.is_enabled(Some("ns=example.com")));
        assert!(params.is_enabled(Some("n=10")));
        assert!(params.is_enabled(Some("last=")));
        assert!(params.is_enabled(Some("n=abc")));
    }

    #[test]
    fn test_check_limit() {
        let params = PagingParameters::default();
        params
            .check_limit(&PageRequest::new("", 100_000))
            .expect("should not have a limit by default");

        let params = PagingParameters::new(PagingConfig {
            max_page_size: Some(50),
            ..Default::default()
        });
        params
            .check_limit(&PageRequest::new("", 50))
            .expect("should be within the limit");

        let err = params
            .check_limit(&PageRequest::new("", 51))
            .expect_err("should be over the limit");
        assert_eq!(ErrorCode::PaginationNumberInvalid, err.code());
    }
}
