/// Errors that can occur in the data layer.
///
/// The variants keep apart the three outcomes callers branch on:
/// a call that was never well-formed (`InvalidRequest`), a well-formed call
/// that matched or changed nothing (`NotFound`), and a statement the store
/// rejected (`Store`).
#[derive(Debug)]
pub enum DataError {
    /// The call was not well-formed given the record's current state
    /// (missing primary key, nothing to persist, non-numeric key...).
    /// No statement was sent to the store.
    InvalidRequest(String),
    /// The request was well-formed but no matching row exists.
    NotFound(String),
    /// The store failed to execute the statement.
    Store(Box<dyn std::error::Error + Send + Sync>),
}

impl DataError {
    /// Construct a `Store` variant from any error type.
    ///
    /// Used by backend crates (e.g. `graphite-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Store(Box::new(err))
    }

    /// Construct a `Store` variant from a plain message.
    pub fn store_msg(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        DataError::Store(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        DataError::InvalidRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DataError::NotFound(msg.into())
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, DataError::InvalidRequest(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }

    pub fn is_store(&self) -> bool {
        matches!(self, DataError::Store(_))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::Store(err) => write!(f, "Store error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Store(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Convenience alias for data-layer results.
pub type DataResult<T> = Result<T, DataError>;
