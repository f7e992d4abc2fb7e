use std::error::Error;
use std::fmt;
use std::io;

/// Common result type for pagetoc operations
pub type BoxResult<T> = Result<T, Box<dyn Error>>;

/// Error types for pagetoc operations
#[derive(Debug)]
pub enum PagetocError {
    /// IO error wrapper
    Io(io::Error),
    /// Configuration error
    Config(String),
    /// HTML parsing error
    Html(String),
    /// Selector compilation error
    Selector(String),
    /// File watching error
    Watch(String),
    /// Generic error message
    Generic(String),
}

impl fmt::Display for PagetocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagetocError::Io(err) => write!(f, "IO error: {}", err),
            PagetocError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PagetocError::Html(msg) => write!(f, "HTML parse error: {}", msg),
            PagetocError::Selector(msg) => write!(f, "Invalid selector: {}", msg),
            PagetocError::Watch(msg) => write!(f, "Watch error: {}", msg),
            PagetocError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for PagetocError {}

impl From<io::Error> for PagetocError {
    fn from(err: io::Error) -> Self {
        PagetocError::Io(err)
    }
}

impl From<String> for PagetocError {
    fn from(msg: String) -> Self {
        PagetocError::Generic(msg)
    }
}

impl From<&str> for PagetocError {
    fn from(msg: &str) -> Self {
        PagetocError::Generic(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = PagetocError::Selector("a[".to_string());
        assert_eq!(err.to_string(), "Invalid selector: a[");

        let err: PagetocError = "plain".into();
        assert_eq!(err.to_string(), "plain");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err = PagetocError::from(io_err);
        assert!(err.to_string().starts_with("IO error:"));
    }
}
