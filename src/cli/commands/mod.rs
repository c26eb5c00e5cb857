//! One module per subcommand.

pub mod check;
pub mod generate;
pub mod get;
pub mod init;
pub mod list;
pub mod remove;
pub mod set;
pub mod unlock;
