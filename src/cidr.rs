use smoltcp::wire::{Ipv4Address, Ipv4Cidr, Ipv6Address, Ipv6Cidr};

use crate::index::Span;
use crate::record::Family;

use std::cmp;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};


#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cidr {
    V4(Ipv4Cidr),
    V6(Ipv6Cidr),
}

impl Cidr {
    fn new(family: Family, network: u128, prefix_len: u8) -> Self {
        match family {
            Family::Ipv6 => {
                Cidr::V6(Ipv6Cidr::new(Ipv6Address(Ipv6Addr::from(network).octets()), prefix_len))
            }
            Family::Ipv4 | Family::Asn => {
                Cidr::V4(Ipv4Cidr::new(Ipv4Address(Ipv4Addr::from(network as u32).octets()), prefix_len))
            }
        }
    }

    pub fn network(&self) -> u128 {
        match *self {
            Cidr::V4(cidr) => u32::from(Ipv4Addr::from(cidr.address().0)) as u128,
            Cidr::V6(cidr) => u128::from(Ipv6Addr::from(cidr.address().0)),
        }
    }

    pub fn prefix_len(&self) -> u8 {
        match *self {
            Cidr::V4(cidr) => cidr.prefix_len(),
            Cidr::V6(cidr) => cidr.prefix_len(),
        }
    }

    /// Last address of the block.
    pub fn last(&self) -> u128 {
        let host_bits = match *self {
            Cidr::V4(cidr) => 32 - cidr.prefix_len() as u32,
            Cidr::V6(cidr) => 128 - cidr.prefix_len() as u32,
        };
        self.network() | low_mask(host_bits)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Cidr::V4(cidr) => write!(f, "{}/{}", Ipv4Addr::from(cidr.address().0), cidr.prefix_len()),
            Cidr::V6(cidr) => write!(f, "{}/{}", Ipv6Addr::from(cidr.address().0), cidr.prefix_len()),
        }
    }
}

/// `2^bits - 1`, saturating at the full 128-bit mask.
fn low_mask(bits: u32) -> u128 {
    if bits >= 128 {
        u128::max_value()
    } else {
        (1u128 << bits) - 1
    }
}


/// Walks `first..=last` emitting the largest aligned block that fits at
/// each step.
pub struct CidrIter {
    family: Family,
    next: u128,
    last: u128,
    done: bool,
}

impl CidrIter {
    pub fn new(family: Family, first: u128, last: u128) -> Self {
        let max = low_mask(family.bits());
        CidrIter {
            family,
            next: first,
            last: cmp::min(last, max),
            done: first > last || first > max,
        }
    }
}

impl Iterator for CidrIter {
    type Item = Cidr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let bits = self.family.bits();
        let align = cmp::min(bits, self.next.trailing_zeros());
        let remaining = self.last - self.next;
        let fits = if remaining == u128::max_value() {
            128
        } else {
            127 - (remaining + 1).leading_zeros()
        };
        let shift = cmp::min(align, fits);

        let cidr = Cidr::new(self.family, self.next, (bits - shift) as u8);
        let block_last = self.next + low_mask(shift);
        if block_last >= self.last {
            self.done = true;
        } else {
            self.next = block_last + 1;
        }

        Some(cidr)
    }
}

/// Minimal list of CIDR blocks covering exactly `first..=last`, in
/// increasing address order.
pub fn range_to_cidrs(family: Family, first: u128, last: u128) -> Vec<Cidr> {
    CidrIter::new(family, first, last).collect()
}

/// Joins spans that touch or overlap into maximal `(first, last)` runs.
///
/// `spans` must be ordered by `first`.
pub fn merge_spans<'a, I>(spans: I) -> Vec<(u128, u128)>
    where I: IntoIterator<Item = &'a Span>
{
    let mut merged: Vec<(u128, u128)> = Vec::new();
    for span in spans {
        if let Some(tail) = merged.last_mut() {
            if tail.1 == u128::max_value() || span.first <= tail.1 + 1 {
                tail.1 = cmp::max(tail.1, span.last);
                continue;
            }
        }
        merged.push((span.first, span.last));
    }

    merged
}
