//! Bit-width helpers shared by the selectors and the controller.

/// Returns a mask with the low `bits` bits set. Saturates at 64.
#[inline(always)]
pub const fn mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// Returns `true` if `value` is representable in `bits` bits.
#[inline(always)]
pub const fn fits(value: u64, bits: u32) -> bool {
    value & !mask(bits) == 0
}

/// Exact base-2 logarithm of a power of two.
///
/// Callers validate power-of-two inputs first; other values round down.
#[inline]
pub const fn log2(value: usize) -> u32 {
    if value == 0 { 0 } else { value.ilog2() }
}
