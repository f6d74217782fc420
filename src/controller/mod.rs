//! UI-free state machines behind the events screen.
pub mod list;
pub mod lookup;
pub mod status;

pub use list::{FetchOutcome, FetchTicket, ListController, page_window};
pub use lookup::{ContactAction, LookupTicket, UserInfoDialog, UserLookupController};
pub use status::{StatusEditController, StatusUpdate, UpdateOutcome};
