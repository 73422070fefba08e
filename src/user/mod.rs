//! Learner state persisted to durable storage.

mod hard;
mod store;

pub use hard::{HardLessons, HARD_STORAGE_KEY};
pub use store::{UserState, UserStore, USER_STORAGE_KEY};
