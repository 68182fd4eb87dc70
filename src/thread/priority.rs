//! Scheduling-priority convention and its native mapping.
//!
//! The portable convention is `0..=31` with **higher meaning more urgent**. Native
//! schedulers frequently use the opposite direction, so the inversion lives in one
//! pure function instead of being scattered through call sites.

/// Highest portable priority; also the top of the valid range.
pub const MAX: u8 = 31;

/// Maps a portable priority onto the native convention.
///
/// The native value descends as the portable value rises: portable `0` (least urgent)
/// becomes native `31`, portable [`MAX`] becomes native `0`. On hosted targets the
/// result is a scheduling hint only; the host scheduler keeps final say.
///
/// # Examples
///
/// ```rust
/// use osal::thread::priority;
///
/// assert_eq!(priority::to_native(5), 26);
/// assert_eq!(priority::to_native(20), 11);
/// ```
#[must_use]
pub fn to_native(priority: u8) -> i32 {
    debug_assert!(priority <= MAX);
    i32::from(MAX) - i32::from(priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_endpoints() {
        assert_eq!(to_native(0), 31);
        assert_eq!(to_native(MAX), 0);
    }

    #[test]
    fn test_direction_inverts() {
        assert_eq!(to_native(5), 26);
        assert_eq!(to_native(20), 11);
        assert!(to_native(20) < to_native(5));
    }
}
