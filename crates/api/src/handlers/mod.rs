//! Request handlers, one submodule per resource.
//!
//! Handlers delegate persistence to the repositories in `ironquest_db`,
//! game rules to `ironquest_core`, and map errors via [`crate::error::AppError`].

pub mod admin;
pub mod auth;
pub mod character;
pub mod coach;
pub mod quests;
pub mod workouts;
