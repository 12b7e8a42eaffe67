//! Single-bit register arithmetic
//!
//! The pure half of a read-modify-write: given the word read back from a
//! multi-purpose register, compute the word to write so that exactly one
//! bit changes.

/// Return `value` with bit `offset` forced to `flag`
///
/// Every other bit is preserved. `offset` must be below 32.
pub fn with_bit(value: i32, offset: u8, flag: bool) -> i32 {
    debug_assert!(offset < 32);
    let mask = !(1u32 << offset);
    let cleared = value as u32 & mask;
    (cleared | (u32::from(flag) << offset)) as i32
}

/// Read bit `offset` of `value`
pub fn bit(value: i32, offset: u8) -> bool {
    debug_assert!(offset < 32);
    (value as u32 >> offset) & 1 != 0
}
