pub mod prelude;

pub mod blog_posts;
pub mod contacts;
pub mod content;
pub mod job_applications;
pub mod training_applications;
pub mod users;
