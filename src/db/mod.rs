pub mod init;
pub mod read;
pub mod store;
pub mod utils;
pub mod write;

pub use store::SqliteStore;
