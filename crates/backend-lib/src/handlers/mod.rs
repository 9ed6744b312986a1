//! Request handlers.

pub mod activities;

pub use activities::{list_activities, root, signup, unregister};
