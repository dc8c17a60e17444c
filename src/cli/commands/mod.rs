mod accounts;
mod init;
mod password;

pub use accounts::{cmd_reset_admin_password, cmd_users};
pub use init::cmd_init;
pub use password::{cmd_check_password, cmd_hash_password};
