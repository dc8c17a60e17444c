//! CLI module - command-line interface for sitecms
//!
//! Serving is the default; the remaining commands are admin maintenance tools.

mod commands;

use clap::{Parser, Subcommand};

/// sitecms - content backend for a company website
#[derive(Parser)]
#[command(name = "sitecms")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the database and serve the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Set the admin password, creating the admin account if missing
    ResetAdminPassword {
        /// New password
        password: String,
    },

    /// List accounts and check the admin password hash
    #[command(alias = "ls")]
    Users,

    /// Check a candidate password against the admin account
    CheckPassword {
        /// Candidate password
        password: String,
    },

    /// Print a password hash for manual provisioning
    HashPassword {
        /// Password to hash
        password: String,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
