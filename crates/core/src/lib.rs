//! Tutorlink domain core.
//!
//! Pure domain logic with no internal dependencies: the requirement
//! matching engine, budget-range parsing, ordinal skill levels, and the
//! shared error taxonomy. Nothing in this crate touches the network or
//! the database.

pub mod budget;
pub mod error;
pub mod matching;
pub mod skill;
pub mod types;
