/// Bytes needed to move `offset` up to the next multiple of `unit`.
/// Zero when `offset` is already aligned.
pub fn padding(offset: u64, unit: u64) -> u64 {
    if unit == 0 {
        return 0;
    }
    let rem = offset % unit;
    if rem == 0 { 0 } else { unit - rem }
}

/// Round `offset` up to the next multiple of `unit`.
pub fn align_up(offset: u64, unit: u64) -> u64 {
    offset + padding(offset, unit)
}
