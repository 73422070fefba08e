//! Observable state containers.
//!
//! A [`Store`] holds an immutable snapshot of some state, swaps it wholesale
//! on every mutation and then notifies its subscribers. [`Selector`] derives
//! a value from a store and keeps it current.

mod selector;
mod store;

pub use selector::Selector;
pub use store::{Store, Subscription};
