//! Authentication building blocks (JWT validation).

pub mod jwt;
