pub mod custody;
pub mod oracle;
pub mod strategy;

pub use custody::*;
pub use oracle::*;
pub use strategy::*;
