use thiserror::Error;

/// Errors returned when a payload cannot be decoded into a model.
///
/// Unknown fields, unknown enum values, and unknown connection names are
/// never errors; they are dropped during decoding.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("{model}: payload must be a JSON object")]
    NotAnObject { model: &'static str },

    #[error("{model}: required field {key:?} is missing")]
    MissingRequiredField {
        model: &'static str,
        key: &'static str,
    },

    #[error("{model}: required field {key:?} could not be read as {expected}")]
    InvalidField {
        model: &'static str,
        key: &'static str,
        expected: &'static str,
    },

    #[error("{model}: required nested field {key:?} failed to decode: {source}")]
    NestedDecodeFailure {
        model: &'static str,
        key: &'static str,
        source: Box<DecodeError>,
    },

    #[error("page item {index} failed to decode: {source}")]
    Item {
        index: usize,
        source: Box<DecodeError>,
    },

    #[error("collection payload has no \"data\" array")]
    MissingPageData,

    #[error("page cursor is exhausted; there is no next request")]
    CursorExhausted,
}
