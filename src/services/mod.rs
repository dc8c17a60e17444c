pub mod auth_service;
pub use auth_service::{AccountSummary, AuthError, AuthService, LoginResult, ResetOutcome};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod content_service;
pub use content_service::{ContentError, ContentService, StoredSection};

pub mod content_service_impl;
pub use content_service_impl::{SeaOrmContentService, validate_section_name};

pub mod forms;
pub use forms::{ContactForm, FormService, JobForm, SubmissionError, TrainingForm};

pub mod password;
pub use password::PasswordHasher;

pub mod seed_data;

pub mod seeder;
pub use seeder::{SeedReport, Seeder};

pub mod token;
pub use token::{Claims, Subject, TokenError, TokenService};

pub mod upload;
pub use upload::{StoredUpload, UploadError, UploadService};
