//! Domain operations of the campus application.
//!
//! Every data-access function takes `&C where C: ConnectionTrait`, so the
//! caller decides whether it runs on the pool or inside the request's
//! transaction. Operations that must be atomic on their own (registration,
//! cascading deletes) take `C: TransactionTrait` and open a nested
//! transaction, which becomes a savepoint when the caller already holds one.

pub mod courses;
pub mod credential;
pub mod dto;
pub mod enrollments;
pub mod error;
pub mod grades;
pub mod grading;
pub mod items;
pub mod sessions;
pub mod students;
pub mod users;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, ServiceError};
