#![forbid(unsafe_code)]

use thiserror::Error;

/// Error enumerates the errors returned by this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Input parameter logging.
    #[error("chat_server input parameters:\n{}", .0)]
    InputParms(String),

    /// Inaccessible logger configuration file.
    #[error("Unable to access the Log4rs configuration file: {}", .0)]
    Log4rsInitialization(String),

    #[error("Reading application configuration file: {}", .0)]
    ReadingConfigFile(String),

    #[error("Unable to parse TOML file: {}", .0)]
    TOMLParseError(String),
}

/// Request level errors produced while resolving a chat record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The path identifier is not a base-10 integer.
    #[error("Unable to parse request id.")]
    Parse(String),

    #[error("No item found.")]
    NotFound(i32),

    /// The matched record could not be serialized.
    #[error("{}", .0)]
    Render(String),

    /// Raised only when a store is built from records sharing an id.
    #[error("Duplicate chat id: {}", .0)]
    DuplicateId(i32),
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::ChatError;

    #[test]
    fn client_messages() {
        assert_eq!(ChatError::Parse("abc".to_string()).to_string(), "Unable to parse request id.");
        assert_eq!(ChatError::NotFound(5).to_string(), "No item found.");
        assert_eq!(ChatError::DuplicateId(3).to_string(), "Duplicate chat id: 3");
    }
}
