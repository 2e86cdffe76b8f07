pub mod wad;

pub use wad::*;
