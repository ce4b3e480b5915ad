pub mod actions;
pub mod identity;
pub mod users;
