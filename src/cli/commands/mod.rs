mod find;
mod history;
mod init;
mod search;

pub use find::cmd_find;
pub use history::cmd_history;
pub use init::cmd_init;
pub use search::cmd_search;
