use std::path::PathBuf;
use thiserror::Error;

/// Core error type for deuglify operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message} ({line}:{column})")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    #[error("Failed to parse config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach a 1-based location to a parser error.
    #[must_use]
    pub fn from_parse(err: &deuglify_parser::ParseError, source: &str) -> Self {
        let (line, column) = err.line_col(source);
        Self::Parse {
            message: err.message.clone(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_location() {
        let source = "var a;\nvar = 1;";
        let err = deuglify_parser::parse(source).unwrap_err();
        let err = Error::from_parse(&err, source);
        match &err {
            Error::Parse { line, column, .. } => {
                assert_eq!(*line, 2);
                assert_eq!(*column, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().ends_with("(2:5)"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = Error::Io {
            path: PathBuf::from("missing.js"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "Failed to read missing.js: not found");
    }
}
