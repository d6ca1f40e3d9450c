use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Timestamp out of range: {value}")]
    TimestampOutOfRange { value: f64 },

    #[error("Invalid time zone: {value}")]
    InvalidTimeZone { value: String },

    #[error("Invalid entry id: {value}")]
    InvalidId { value: String },
}
