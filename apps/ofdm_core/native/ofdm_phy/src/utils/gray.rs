//! Reflected binary Gray code helpers

/// Binary index → Gray code
#[inline]
pub fn binary_to_gray(n: u8) -> u8 {
    n ^ (n >> 1)
}

/// Gray code → binary index
#[inline]
pub fn gray_to_binary(g: u8) -> u8 {
    let mut n = g;
    let mut shift = g >> 1;
    while shift != 0 {
        n ^= shift;
        shift >>= 1;
    }
    n
}
