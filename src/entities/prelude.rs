pub use super::blog_posts::Entity as BlogPosts;
pub use super::contacts::Entity as Contacts;
pub use super::content::Entity as Content;
pub use super::job_applications::Entity as JobApplications;
pub use super::training_applications::Entity as TrainingApplications;
pub use super::users::Entity as Users;
