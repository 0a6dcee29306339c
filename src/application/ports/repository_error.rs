/// Storage failure. The rendered message ends up in the `error` field of a
/// transaction chunk, so it must not carry row contents.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage unavailable: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("transaction {0} not found")]
    NotFound(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("stored row could not be decoded: {0}")]
    CorruptRow(String),
}
