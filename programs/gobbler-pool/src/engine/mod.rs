pub mod conversion;
pub mod orchestrator;
pub mod shares;
pub mod vault;
pub mod window;

pub use conversion::*;
pub use orchestrator::MintedIndex;
pub use shares::*;
pub use vault::*;
pub use window::*;
