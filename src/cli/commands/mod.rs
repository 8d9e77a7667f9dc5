mod init;
mod stats;
mod users;

pub use init::cmd_init;
pub use stats::cmd_stats;
pub use users::cmd_create_user;
