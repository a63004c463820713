//! Byte-compare primitive for label matching.
//!
//! Every descent (exact, fuzzy at zero budget, mutation) funnels its
//! label comparisons through [`common_prefix_len`]. Correctness does
//! not depend on the load width; the widened path only accelerates
//! long equal runs.

/// Returns the smallest index at which `a` and `b` differ, or
/// `min(a.len(), b.len())` when one is a prefix of the other.
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    let n = a.len().min(b.len());

    // Compare 8 bytes at a time while the chunks match.
    let chunks = n / 8;
    for i in 0..chunks {
        let off = i * 8;
        let va = u64::from_ne_bytes(a[off..off + 8].try_into().unwrap());
        let vb = u64::from_ne_bytes(b[off..off + 8].try_into().unwrap());
        if va != vb {
            let diff = va ^ vb;
            // to_le() normalises so trailing zeros give the first
            // differing byte on either endianness.
            return off + (diff.to_le().trailing_zeros() / 8) as usize;
        }
    }

    for i in chunks * 8..n {
        if a[i] != b[i] {
            return i;
        }
    }
    n
}
