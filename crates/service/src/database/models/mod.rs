mod file;
mod user;

pub use file::{File, PAGE_SIZE};
pub use user::User;
