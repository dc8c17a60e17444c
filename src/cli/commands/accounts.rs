//! Account maintenance commands

use crate::config::Config;
use crate::constants::bootstrap::ADMIN_USERNAME;
use crate::db::Store;
use crate::models::Role;
use crate::services::{
    AuthService, PasswordHasher, ResetOutcome, SeaOrmAuthService, TokenService,
};

pub async fn cmd_reset_admin_password(config: &Config, password: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let hasher = PasswordHasher::new(&config.security)?;

    // Token signing is unused here; the secret may legitimately be unset
    let tokens = TokenService::new(
        config.security.jwt_secret.as_deref().unwrap_or_default(),
        config.security.token_ttl_hours,
    );
    let auth = SeaOrmAuthService::new(
        store.clone(),
        hasher,
        tokens,
        config.security.min_password_length,
    );

    let outcome = auth.reset_or_create_admin(password).await?;
    store.close().await?;

    match outcome {
        ResetOutcome::Updated => println!("✓ Password for '{ADMIN_USERNAME}' updated"),
        ResetOutcome::Created => println!("✓ Account '{ADMIN_USERNAME}' created with role admin"),
    }

    Ok(())
}

pub async fn cmd_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let accounts = store.users().list().await?;
    let admins = store.users().count_with_role(Role::Admin).await?;
    store.close().await?;

    if accounts.is_empty() {
        println!("No accounts found.");
        println!();
        println!("Start the server once to seed the admin account, or run:");
        println!("  sitecms reset-admin-password <password>");
        return Ok(());
    }

    println!("Accounts ({} total, {admins} admin)", accounts.len());
    println!("{:-<70}", "");

    for account in &accounts {
        println!(
            "{:>4}  {:<20} {:<8} {}",
            account.id, account.username, account.role, account.created_at
        );
    }

    println!();
    match accounts.iter().find(|a| a.username == ADMIN_USERNAME) {
        Some(admin) if PasswordHasher::is_well_formed(&admin.password_hash) => {
            println!("✓ Admin password hash is well formed");
        }
        Some(_) => println!("✗ Admin password hash is malformed; reset it"),
        None => println!("✗ No '{ADMIN_USERNAME}' account"),
    }

    Ok(())
}
