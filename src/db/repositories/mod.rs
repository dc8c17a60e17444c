pub mod blog;
pub mod content;
pub mod submissions;
pub mod user;
