//! Shared value types for the strato client SDK.
//!
//! This crate holds the pieces with no I/O of their own: the structured
//! [`Payload`] model exchanged with the service, and the [`Deadline`]
//! type used for completion-polling arithmetic.

pub mod deadline;
pub mod payload;

pub use deadline::Deadline;
pub use payload::Payload;
