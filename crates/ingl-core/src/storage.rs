//! Storage bucket assignment for the external registry program.
//!
//! The registry stores validator entries in fixed-capacity storage accounts.
//! A new validator lands in bucket `floor(validation_number / capacity)`.

use crate::errors::{OnboardError, OnboardResult};

/// Default bucket capacity K: a 10 KiB storage account holding 32-byte keys
/// after an 8-byte header.
pub const DEFAULT_STORAGE_CAPACITY: u32 = (10_240 - 8) / 32;

/// Bucket index for the next registration given the registry counter.
pub fn storage_bucket(counter: u32, capacity: u32) -> OnboardResult<u32> {
    if capacity == 0 {
        return Err(OnboardError::config("storage capacity must be greater than zero"));
    }
    Ok(counter / capacity)
}
