use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("path '{0}' does not resolve in the experiment definition")]
    MissingParent(String),

    #[error("batch criteria parse error: section '{section}' of '{input}': {reason}")]
    CriteriaParse {
        input: String,
        section: String,
        reason: String,
    },

    #[error("batch criteria setup error: {0}")]
    CriteriaSetup(String),

    #[error("write config error: {0}")]
    WriteConfig(String),

    #[error("malformed array cell '{0}'")]
    ArrayCell(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type BatchResult<T> = Result<T, BatchError>;
