pub mod action;
pub mod route;

pub use action::{Action, NotifyLevel};
pub use route::{is_owner_path, resolve, ViewId, OWNER_ROOT};
