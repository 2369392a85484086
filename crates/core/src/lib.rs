//! Domain logic for IronQuest: rewards, leveling, quests, workouts.
//!
//! Nothing in this crate performs I/O; the `db` and `api` crates load state,
//! call into these functions, and persist the results.

pub mod account;
pub mod dashboard;
pub mod error;
pub mod progression;
pub mod quest;
pub mod reward;
pub mod roles;
pub mod types;
pub mod workout;
