pub mod client;
pub mod endpoints;
pub mod models;

pub use client::{Backend, HttpBackend};
pub use models::{CATEGORIES, EmailRecord, Filter};
