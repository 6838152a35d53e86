pub mod config;
pub mod detection;
pub mod error;
pub mod features;
pub mod transaction;

pub use config::Config;
pub use detection::*;
pub use error::*;
pub use features::*;
pub use transaction::*;
