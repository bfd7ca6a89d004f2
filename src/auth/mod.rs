pub mod capture;
pub mod login;
pub mod storage;

pub use capture::{CaptureOutcome, capture_token};
pub use login::{LoginStart, start_login};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, TOKEN_KEY};
