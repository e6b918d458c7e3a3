pub mod task;
pub mod collection;
pub mod config;

pub use task::*;
pub use collection::*;
pub use config::*;
