//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept any SQLite executor as the first argument: `&DbPool` for
//! one-off queries, `&mut *tx` inside a transaction.

pub mod character_repo;
pub mod quest_repo;
pub mod user_repo;
pub mod workout_repo;

pub use character_repo::CharacterRepo;
pub use quest_repo::QuestRepo;
pub use user_repo::UserRepo;
pub use workout_repo::WorkoutRepo;
