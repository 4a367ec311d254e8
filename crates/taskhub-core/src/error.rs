//! Remote error types for the workspace client abstraction.
//!
//! Every failure of a remote call is reported as a [`RemoteError`] tagged with
//! the [`RemoteOp`] that produced it. The engine never wraps or retries these
//! errors; they propagate unchanged to the caller.

use std::fmt;

/// The remote operation a call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    /// Listing the children of a scope.
    ListChildren,
    /// Reading the live schema of a store.
    RetrieveDatabase,
    /// Querying the rows of a store.
    QueryDatabase,
    /// Creating a page under a scope.
    CreatePage,
    /// Creating a store under a scope.
    CreateDatabase,
    /// Updating the schema of a store.
    UpdateDatabase,
    /// Creating a row in a store.
    CreateRow,
    /// Appending content blocks to a page.
    AppendBlocks,
}

impl RemoteOp {
    /// Returns `true` for operations that mutate remote state.
    #[must_use]
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Self::CreatePage
                | Self::CreateDatabase
                | Self::UpdateDatabase
                | Self::CreateRow
                | Self::AppendBlocks
        )
    }
}

impl fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListChildren => "list-children",
            Self::RetrieveDatabase => "retrieve-database",
            Self::QueryDatabase => "query-database",
            Self::CreatePage => "create-page",
            Self::CreateDatabase => "create-database",
            Self::UpdateDatabase => "update-database",
            Self::CreateRow => "create-row",
            Self::AppendBlocks => "append-blocks",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while talking to the remote workspace.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The referenced resource does not exist or is not shared with the integration.
    #[error("{op} failed: resource not found: {id}")]
    NotFound {
        /// The operation that failed.
        op: RemoteOp,
        /// The id that could not be resolved.
        id: String,
    },

    /// The credential was rejected.
    #[error("{op} failed: unauthorized: {message}")]
    Unauthorized {
        /// The operation that failed.
        op: RemoteOp,
        /// Message reported by the remote API.
        message: String,
    },

    /// The remote API answered with an error status.
    #[error("{op} failed (HTTP {status}, {code}): {message}")]
    Api {
        /// The operation that failed.
        op: RemoteOp,
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code reported by the API.
        code: String,
        /// Message reported by the API.
        message: String,
    },

    /// The request never produced a response.
    #[error("{op} failed: connection error: {message}")]
    Connection {
        /// The operation that failed.
        op: RemoteOp,
        /// Transport error description.
        message: String,
    },

    /// The response could not be understood.
    #[error("{op} failed: malformed response: {message}")]
    Decode {
        /// The operation that failed.
        op: RemoteOp,
        /// Description of the decoding problem.
        message: String,
    },
}

impl RemoteError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(op: RemoteOp, id: impl Into<String>) -> Self {
        Self::NotFound { op, id: id.into() }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(op: RemoteOp, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            op,
            message: message.into(),
        }
    }

    /// Creates a new `Api` error.
    #[must_use]
    pub fn api(
        op: RemoteOp,
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Api {
            op,
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(op: RemoteOp, message: impl Into<String>) -> Self {
        Self::Connection {
            op,
            message: message.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(op: RemoteOp, message: impl Into<String>) -> Self {
        Self::Decode {
            op,
            message: message.into(),
        }
    }

    /// Returns the operation this error came from.
    #[must_use]
    pub fn op(&self) -> RemoteOp {
        match self {
            Self::NotFound { op, .. }
            | Self::Unauthorized { op, .. }
            | Self::Api { op, .. }
            | Self::Connection { op, .. }
            | Self::Decode { op, .. } => *op,
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the credential was rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        if self.op().is_write() {
            ErrorCategory::Write
        } else {
            ErrorCategory::Lookup
        }
    }
}

/// Categories of remote errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A read (list, retrieve, query) failed.
    Lookup,
    /// A mutation (create, update, append) failed.
    Write,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup => write!(f, "lookup"),
            Self::Write => write!(f, "write"),
        }
    }
}
