//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Conversions between rows and the domain types in `tutorlink-core`

pub mod match_record;
pub mod message;
pub mod notification;
pub mod requirement;
pub mod tutor;
