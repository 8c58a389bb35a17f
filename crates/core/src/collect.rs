//! First-error-wins collection for flat field decoding
//!
//! Structure decoders read several fixed fields in a row. Every read is
//! attempted, and only the first failure is ever reported:
//!
//! ```rust
//! use bancho_core::{BanchoError, ErrorCollection, Result};
//!
//! fn read_two(a: Result<u8>, b: Result<u8>) -> Result<(u8, u8)> {
//!     let mut errors = ErrorCollection::new();
//!     let a = errors.add(a).unwrap_or_default();
//!     let b = errors.add(b).unwrap_or_default();
//!     errors.resolve()?;
//!     Ok((a, b))
//! }
//!
//! let err = read_two(Err(BanchoError::InvalidData("first".into())), Err(BanchoError::InvalidData("second".into())));
//! assert_eq!(err.unwrap_err().to_string(), "Invalid data: first");
//! ```

use crate::{BanchoError, Result};

/// Records field-read failures and surfaces the first one
#[derive(Debug, Default)]
pub struct ErrorCollection {
    errors: Vec<BanchoError>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error of a failed read, passing successful values through
    pub fn add<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    /// Return the first recorded error, if any
    pub fn resolve(self) -> Result<()> {
        match self.errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
