pub mod error;
pub mod flags;
pub mod stats;
pub mod types;

pub use error::*;
pub use flags::*;
pub use types::*;
