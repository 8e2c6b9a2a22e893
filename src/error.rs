use std::fmt::Display;

use hyper::http::uri::InvalidUri;
use tracing::{error, warn};

mod error_code;
pub use error_code::ErrorCode;
pub use error_code::Errors;
pub use error_code::RegistryError;

/// Struct to represent when the library encounters an error,
///
#[derive(Debug)]
pub struct Error {
    category: ErrorCategory,
}

impl Error {
    /// Returns an error that indicates a url could not be parsed,
    ///
    pub fn malformed_url(url: impl Into<String>) -> Self {
        let url = url.into();
        warn!("Could not parse url, {url}");
        Error {
            category: ErrorCategory::MalformedUrl(url),
        }
    }

    /// Returns an error that indicates a data-format issue,
    ///
    pub fn data_format(details: impl Into<String>) -> Self {
        Error {
            category: ErrorCategory::DataFormat(details.into()),
        }
    }

    /// Returns an error that indicates that there was an error using an external dependency,
    ///
    /// Storage backends use this when they fail for any reason other than a missing path,
    ///
    pub fn external_dependency(details: impl Into<String>) -> Self {
        Error {
            category: ErrorCategory::ExternalDependency(details.into()),
        }
    }

    /// Returns an error that indicates that there was an error with the system env. For example reading a file, etc.
    ///
    pub fn system_environment(details: impl Into<String>) -> Self {
        Error {
            category: ErrorCategory::SystemEnvironment(details.into()),
        }
    }

    /// Returns true if this error was caused by an unparseable url,
    ///
    pub fn is_malformed_url(&self) -> bool {
        matches!(self.category, ErrorCategory::MalformedUrl(_))
    }
}

#[derive(Debug)]
enum ErrorCategory {
    DataFormat(String),
    ExternalDependency(String),
    SystemEnvironment(String),
    MalformedUrl(String),
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.category {
            ErrorCategory::DataFormat(details) => write!(f, "data format error, {details}"),
            ErrorCategory::ExternalDependency(details) => {
                write!(f, "external dependency error, {details}")
            }
            ErrorCategory::SystemEnvironment(details) => {
                write!(f, "system environment error, {details}")
            }
            ErrorCategory::MalformedUrl(url) => write!(f, "malformed url, {url}"),
        }
    }
}

impl From<InvalidUri> for Error {
    fn from(value: InvalidUri) -> Self {
        error!("Error parsing uri, {value}");
        Self::malformed_url(value.to_string())
    }
}

impl From<hyper::http::Error> for Error {
    fn from(value: hyper::http::Error) -> Self {
        error!("Error building http value, {value}");
        Self::malformed_url(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        error!("Error w/ system i/o, {value}");
        Self::system_environment(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        error!("Error with json serialization, {value}");
        Self::data_format(value.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(value: serde_urlencoded::ser::Error) -> Self {
        error!("Error encoding query, {value}");
        Self::data_format(value.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        error!("Error reading toml config, {value}");
        Self::data_format(value.to_string())
    }
}
