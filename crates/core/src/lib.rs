//! Bancho Core - Error taxonomy and shared decoding utilities

mod error;
mod collect;

pub use error::*;
pub use collect::*;
