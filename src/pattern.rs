//! IPv6 allocations known only by their leading groups.
//!
//! Some LIR objects give an IPv6 start address without a prefix length.
//! Those are kept as group patterns (`2001:0670:0085`). A pattern matches
//! an address when its groups equal the address's leading groups, which is
//! exactly the block [`bounds`] returns.

use crate::error::{Error, Result};


/// Canonical pattern text: lower-case, four hex digits per group, trailing
/// zero groups dropped.
///
/// `"2001:670:85::"` and `"2001:0670:0085"` both give `"2001:0670:0085"`.
pub fn normalize(text: &str) -> Result<String> {
    let text = text.trim();
    let body = text.trim_end_matches(':');
    if body.is_empty() || body.contains("::") {
        return Err(Error::MalformedAddress(format!("{} (not an IPv6 prefix pattern)", text)));
    }

    let mut groups = Vec::new();
    for group in body.split(':') {
        if group.is_empty() || group.len() > 4 {
            return Err(Error::MalformedAddress(format!("{} (not an IPv6 prefix pattern)", text)));
        }
        let value = u16::from_str_radix(group, 16)
            .map_err(|_| Error::MalformedAddress(format!("{} (not an IPv6 prefix pattern)", text)))?;
        groups.push(value);
    }
    if groups.len() > 8 {
        return Err(Error::MalformedAddress(format!("{} (more than eight groups)", text)));
    }
    while groups.len() > 1 && groups.last() == Some(&0) {
        groups.pop();
    }

    Ok(join(&groups))
}

fn join(groups: &[u16]) -> String {
    groups.iter().map(|g| format!("{:04x}", g)).collect::<Vec<String>>().join(":")
}

/// Number of 16-bit groups in a normalized pattern.
pub fn group_count(pattern: &str) -> usize {
    pattern.split(':').count()
}

/// Inclusive address bounds covered by a normalized pattern.
pub fn bounds(pattern: &str) -> (u128, u128) {
    let mut first = 0u128;
    let mut groups = 0u32;
    for group in pattern.split(':').take(8) {
        first |= (u16::from_str_radix(group, 16).unwrap_or(0) as u128) << (112 - 16 * groups);
        groups += 1;
    }
    let host_bits = 128 - 16 * groups;
    let host_mask = if host_bits == 0 { 0 } else { (1u128 << host_bits) - 1 };

    (first, first | host_mask)
}
