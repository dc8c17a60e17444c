//! Password diagnostics commands

use crate::config::Config;
use crate::constants::bootstrap::ADMIN_USERNAME;
use crate::db::Store;
use crate::services::PasswordHasher;

pub async fn cmd_check_password(config: &Config, password: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let admin = store.users().find_by_username(ADMIN_USERNAME).await?;
    store.close().await?;

    let Some(admin) = admin else {
        anyhow::bail!("No '{ADMIN_USERNAME}' account found");
    };

    let hasher = PasswordHasher::new(&config.security)?;
    if hasher.verify(password, &admin.password_hash).await? {
        println!("✓ Password matches '{ADMIN_USERNAME}'");
        Ok(())
    } else {
        anyhow::bail!("Password does not match '{ADMIN_USERNAME}'")
    }
}

pub async fn cmd_hash_password(config: &Config, password: &str) -> anyhow::Result<()> {
    if password.chars().count() < config.security.min_password_length {
        anyhow::bail!(
            "Password must be at least {} characters",
            config.security.min_password_length
        );
    }

    let hasher = PasswordHasher::new(&config.security)?;
    println!("{}", hasher.hash(password).await?);
    Ok(())
}
