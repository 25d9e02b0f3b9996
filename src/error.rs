//! Domain-specific errors for the transaction record store.
//!
//! Contains error variants for the failure cases of the service layer:
//! - Creating a transaction under an identifier that is already taken
//! - Reading, updating or deleting a transaction that does not exist
//! - Updating a field that cannot change after creation
//!
//! These errors represent business logic failures rather than technical
//! errors like I/O or parsing issues. The store itself never fails; all of
//! these are raised by [`crate::TransactionService`] after consulting it.

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied identifier collides with an existing record.
    #[error("transaction with ID {0} already exists")]
    AlreadyExists(String),

    /// No record is stored under the identifier.
    #[error("transaction with ID {0} not found")]
    NotFound(String),

    /// The update tried to change a field that is fixed once the record is
    /// created.
    #[error("{field} cannot be changed")]
    ImmutableFieldViolation { field: &'static str },
}
