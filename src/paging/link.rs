use hyper::Uri;
use tracing::{event, Level};

use crate::{Error, PageRequest, PagingParameters};

impl PagingParameters {
    /// Uses the original url from the request to create the value of a `Link` header pointing at the next page,
    ///
    /// The query is replaced w/ the page size and cursor, and any fragment is dropped,
    ///
    /// ```markdown
    /// </v2/_catalog?last=b&n=2>; rel="next"
    /// ```
    ///
    pub fn create_link(&self, original_url: &str, page: &PageRequest) -> Result<String, Error> {
        let without_fragment = original_url.split('#').next().unwrap_or_default();
        let called = without_fragment
            .parse::<Uri>()
            .map_err(|_| Error::malformed_url(original_url))?;

        let mut params = vec![
            (self.config().size_parameter.as_str(), page.n.to_string()),
            (self.config().cursor_parameter.as_str(), page.last.clone()),
        ];
        params.sort_by(|a, b| a.0.cmp(b.0));
        let query = serde_urlencoded::to_string(&params)?;

        let path = match called.path() {
            "" if called.scheme().is_some() => "/",
            path => path,
        };

        let mut next = Uri::builder();
        if let Some(scheme) = called.scheme() {
            next = next.scheme(scheme.clone());
        }
        if let Some(authority) = called.authority() {
            next = next.authority(authority.clone());
        }
        let next = next.path_and_query(format!("{path}?{query}")).build()?;

        event!(Level::TRACE, "Created next link, {next}");
        Ok(format!("<{next}>; rel=\"next\""))
    }
}
