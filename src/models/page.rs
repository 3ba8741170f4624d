//! Offset/size pagination with page-aligned offsets.
//!
//! Callers supply a zero-based `from` offset and a page `size`. The offset is
//! translated to the page boundary containing `from` (`from / size` pages),
//! so a `from` that is not a multiple of `size` snaps backwards.

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy)]
pub struct Page {
    from: i64,
    size: i64,
}

impl Page {
    pub fn new(from: i64, size: i64) -> AppResult<Self> {
        if from < 0 || size < 1 {
            return Err(AppError::Validation(format!(
                "Illegal argument for pagination: from [{}], size [{}].",
                from, size
            )));
        }
        Ok(Self { from, size })
    }

    /// Row offset of the page containing `from`
    pub fn offset(&self) -> i64 {
        (self.from / self.size) * self.size
    }

    /// Page size
    pub fn limit(&self) -> i64 {
        self.size
    }
}
