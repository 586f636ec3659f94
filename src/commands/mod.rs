pub mod config;
pub mod daemon;
pub mod fingerprint;
pub mod get;
pub mod refresh;

pub use config::*;
pub use daemon::*;
pub use fingerprint::*;
pub use get::*;
pub use refresh::*;
