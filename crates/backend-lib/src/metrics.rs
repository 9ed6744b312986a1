// ============================
// crates/backend-lib/src/metrics.rs
// ============================
//! Central place for metric keys
pub const SIGNUP_ACCEPTED: &str = "activity.signup.accepted";
pub const SIGNUP_REJECTED: &str = "activity.signup.rejected";
pub const UNREGISTER_ACCEPTED: &str = "activity.unregister.accepted";
pub const UNREGISTER_REJECTED: &str = "activity.unregister.rejected";
pub const ACTIVITIES_LISTED: &str = "activity.list";
