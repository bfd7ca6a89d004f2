pub mod auth;
pub mod inbox;
pub mod sync;
