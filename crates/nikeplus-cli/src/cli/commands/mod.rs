pub mod activities;
pub mod auth;

pub use activities::{get as get_activity, ids as list_activity_ids, list as list_activities};
pub use auth::{check as check_login, login, resolve_config};
