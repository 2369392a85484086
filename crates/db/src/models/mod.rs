//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Conversions into the `ironquest-core` domain types where the row
//!   representation differs

pub mod character;
pub mod quest;
pub mod user;
pub mod workout;
