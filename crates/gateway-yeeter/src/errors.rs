use thiserror::Error;

/// Errors raised before a valid admission request has been established.
/// These are reported to the caller as HTTP failures.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("cannot decode admission review: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("missing admission request")]
    MissingRequest,

    #[error("admission request does not carry an object")]
    MissingObject,

    #[error("cannot decode pod: {0}")]
    InvalidPod(#[source] serde_json::Error),
}

/// Errors raised while computing the mutation of an admitted pod.
/// None of them ever turns into a rejection.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("cannot parse networks annotation: {0}")]
    AnnotationParse(#[source] serde_json::Error),

    #[error("cannot serialize patch: {0}")]
    Serialization(#[source] serde_json::Error),
}
