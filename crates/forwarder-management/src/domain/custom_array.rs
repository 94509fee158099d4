//! # Custom Array
//!
//! Linear search over unordered address lists.
//!
//! Membership lists are plain sequences with no hash index; containment and
//! removal both go through [`find_index`]. The function accepts any
//! caller-supplied slice, not only the registry's own sets.

use crate::errors::ArrayError;

/// Returns the index of the first element equal to `target`.
///
/// Scans `sequence` front to back, O(n).
///
/// # Errors
///
/// [`ArrayError::ElementNotFound`] if no element matches.
pub fn find_index<T: PartialEq>(sequence: &[T], target: &T) -> Result<usize, ArrayError> {
    sequence
        .iter()
        .position(|element| element == target)
        .ok_or(ArrayError::ElementNotFound)
}

/// Returns true if `target` occurs anywhere in `sequence`.
#[must_use]
pub fn contains<T: PartialEq>(sequence: &[T], target: &T) -> bool {
    find_index(sequence, target).is_ok()
}

// =============================================================================
// TESTS
// =============================================================================
