//! Conversions between textual addresses and fixed-width integers.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{Error, Result};


/// Largest host count an IPv4 delegation can carry (a /0).
pub const IPV4_SPACE: u64 = 1 << 32;

/// Dotted-quad to its 32-bit value.
///
/// Exactly four decimal octets in `0..=255` are accepted; signs, blanks
/// and empty octets are rejected.
pub fn ip_to_int(address: &str) -> Result<u32> {
    let address = address.trim();
    let octets: Vec<&str> = address.split('.').collect();
    if octets.len() != 4 {
        return Err(Error::MalformedAddress(format!("{} (IPv4 needs four octets)", address)));
    }

    let mut value = 0u32;
    for octet in octets {
        if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedAddress(address.to_string()));
        }
        let n = u16::from_str(octet).map_err(|_| Error::MalformedAddress(address.to_string()))?;
        if n > 255 {
            return Err(Error::MalformedAddress(format!("{} (octet {} out of range)", address, n)));
        }
        value = (value << 8) | n as u32;
    }

    Ok(value)
}

pub fn int_to_ip(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

pub fn ipv6_to_int(address: &str) -> Result<u128> {
    Ipv6Addr::from_str(address.trim())
        .map(u128::from)
        .map_err(|_| Error::MalformedAddress(address.to_string()))
}

pub fn int_to_ipv6(value: u128) -> String {
    Ipv6Addr::from(value).to_string()
}

/// Accepts both `AS64512` and `64512`.
pub fn parse_asn(text: &str) -> Result<u32> {
    let text = text.trim();
    let digits = match text.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => &text[2..],
        _ => text,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedAddress(format!("{} (not an ASN)", text)));
    }

    u32::from_str(digits).map_err(|_| Error::MalformedAddress(format!("{} (not an ASN)", text)))
}

/// Smallest prefix length whose block holds `host_count` addresses.
///
/// Counts that are not a power of two round up to the next one, so
/// 254, 255 and 256 all give a /24 while 257 needs a /23.
pub fn subnet_prefix_for_host_count(host_count: u64) -> Result<u8> {
    if host_count == 0 || host_count > IPV4_SPACE {
        return Err(Error::InvalidHostCount(host_count));
    }

    let bits = host_count.next_power_of_two().trailing_zeros();
    Ok((32 - bits) as u8)
}

/// Splits an RPSL `inetnum` value such as `"1.1.1.1 - 1.1.1.2"`.
///
/// Returns the first address as written and the number of addresses
/// covered, both ends included.
pub fn parse_inetnum_range(text: &str) -> Result<(String, u64)> {
    let mut parts = text.splitn(2, '-');
    let first = parts.next().map(str::trim).unwrap_or("");
    let last = match parts.next() {
        Some(last) => last.trim(),
        None => return Err(Error::MalformedRange(format!("{} (expected first - last)", text))),
    };

    let first_value = ip_to_int(first).map_err(|e| Error::MalformedRange(e.to_string()))?;
    let last_value = ip_to_int(last).map_err(|e| Error::MalformedRange(e.to_string()))?;
    if last_value < first_value {
        return Err(Error::MalformedRange(format!("{} (last address before first)", text)));
    }

    Ok((first.to_string(), (last_value - first_value) as u64 + 1))
}
