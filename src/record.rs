use smoltcp::wire::{Ipv4Address, Ipv6Address};

use crate::codec;
use crate::error::Error;
use crate::pattern;
use crate::{CountryCode, Registry, Status};

use std::fmt;
use std::str::FromStr;
use std::net::{Ipv4Addr, Ipv6Addr};


#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    Ipv4,
    Ipv6,
    Asn,
}

impl Family {
    /// Width of the integer key space.
    pub fn bits(&self) -> u32 {
        match *self {
            Family::Ipv4 | Family::Asn => 32,
            Family::Ipv6 => 128,
        }
    }
}

impl FromStr for Family {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(Family::Ipv4),
            "ipv6" => Ok(Family::Ipv6),
            "asn" => Ok(Family::Asn),
            e => Err(Error::ParseRecordError(format!("Unknown record type ({})", e))),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Family::Ipv4 => write!(f, "ipv4"),
            Family::Ipv6 => write!(f, "ipv6"),
            Family::Asn => write!(f, "asn"),
        }
    }
}


/// Where a record came from. LIR data is more specific and outranks RIR data.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    Rir,
    Lir,
}

impl FromStr for Source {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rir" => Ok(Source::Rir),
            "lir" => Ok(Source::Lir),
            e => Err(Error::ParseRecordError(format!("Unknown source ({})", e))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Source::Rir => write!(f, "rir"),
            Source::Lir => write!(f, "lir"),
        }
    }
}


#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Start {
    Ipv4(Ipv4Address),
    Ipv6(Ipv6Address),
    /// Leading IPv6 groups only, as normalized by [`pattern::normalize`].
    Ipv6Pattern(String),
    Asn(u32),
}

impl Start {
    pub fn family(&self) -> Family {
        match *self {
            Start::Ipv4(_) => Family::Ipv4,
            Start::Ipv6(_) | Start::Ipv6Pattern(_) => Family::Ipv6,
            Start::Asn(_) => Family::Asn,
        }
    }

    /// Integer key of the first address. A pattern starts at its groups
    /// followed by zeros.
    pub fn value(&self) -> u128 {
        match *self {
            Start::Ipv4(addr) => u32::from(Ipv4Addr::from(addr.0)) as u128,
            Start::Ipv6(addr) => u128::from(Ipv6Addr::from(addr.0)),
            Start::Ipv6Pattern(ref p) => pattern::bounds(p).0,
            Start::Asn(asn) => asn as u128,
        }
    }
}

impl fmt::Display for Start {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Start::Ipv4(addr) => write!(f, "{}", Ipv4Addr::from(addr.0)),
            Start::Ipv6(addr) => write!(f, "{}", Ipv6Addr::from(addr.0)),
            Start::Ipv6Pattern(ref p) => write!(f, "{}", p),
            Start::Asn(asn) => write!(f, "{}", asn),
        }
    }
}


#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Extent {
    /// IPv4 address count, not necessarily a power of two.
    Hosts(u64),
    /// IPv6 prefix length.
    Prefix(u8),
    /// One ASN.
    Single,
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Extent::Hosts(n) => write!(f, "{}", n),
            Extent::Prefix(len) => write!(f, "{}", len),
            Extent::Single => write!(f, "1"),
        }
    }
}


#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct DelegationRecord {
    pub registry: Registry,
    pub country: CountryCode,
    pub start: Start,
    pub extent: Extent,
    pub date: Option<String>,
    pub status: Option<Status>,
    /// For IANA records the status column names the receiving registry.
    pub dst_registry: Option<Registry>,
    pub source: Source,
}

impl DelegationRecord {
    pub fn new(registry: Registry, country: CountryCode, start: Start, extent: Extent, source: Source) -> Self {
        DelegationRecord {
            registry,
            country,
            start,
            extent,
            date: None,
            status: None,
            dst_registry: None,
            source,
        }
    }

    pub fn family(&self) -> Family {
        self.start.family()
    }

    pub fn is_pattern(&self) -> bool {
        match self.start {
            Start::Ipv6Pattern(_) => true,
            _ => false,
        }
    }

    /// Inclusive `(first, last)` integer bounds.
    ///
    /// A prefix pattern covers every address whose leading groups match it.
    /// `None` for extents running past the end of the address space.
    pub fn bounds(&self) -> Option<(u128, u128)> {
        if let Start::Ipv6Pattern(ref p) = self.start {
            return Some(pattern::bounds(p));
        }

        let first = self.start.value();
        match (self.family(), self.extent) {
            (Family::Ipv4, Extent::Hosts(n)) if n > 0 => {
                let last = first.checked_add(n as u128 - 1)?;
                if last > u32::max_value() as u128 { None } else { Some((first, last)) }
            }
            (Family::Ipv6, Extent::Prefix(len)) if len <= 128 => {
                let host_mask = if len == 0 { u128::max_value() } else { (1u128 << (128 - len as u32)) - 1 };
                Some((first, first.checked_add(host_mask)?))
            }
            (Family::Asn, Extent::Single) => Some((first, first)),
            _ => None,
        }
    }
}

impl fmt::Display for DelegationRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}|{}|{}|{}|{}|{}|{}|{}",
            self.source,
            self.registry,
            self.country,
            self.family(),
            self.start,
            self.extent,
            self.date.as_ref().map(String::as_str).unwrap_or(""),
            match (self.dst_registry, self.status) {
                (Some(reg), _) => format!("{}", reg),
                (None, Some(status)) => format!("{}", status),
                (None, None) => String::new(),
            })
    }
}

/// Reads back the normalized line written by `Display`.
impl FromStr for DelegationRecord {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim_end().split('|').collect();
        if fields.len() != 8 {
            return Err(Error::ParseRecordError(format!("expected 8 fields: {}", s)));
        }

        let source = Source::from_str(fields[0])?;
        let registry = Registry::from_str(fields[1])?;
        let country = CountryCode::from_str(fields[2])?;
        let family = Family::from_str(fields[3])?;
        let bad_number = |_| Error::ParseRecordError(format!("bad number: {}", s));

        let (start, extent) = match family {
            Family::Ipv4 => {
                let start = codec::ip_to_int(fields[4])?;
                let hosts = u64::from_str(fields[5]).map_err(bad_number)?;
                (Start::Ipv4(Ipv4Address(Ipv4Addr::from(start).octets())), Extent::Hosts(hosts))
            }
            Family::Ipv6 => {
                let len = u8::from_str(fields[5]).map_err(bad_number)?;
                match Ipv6Addr::from_str(fields[4]) {
                    Ok(addr) => (Start::Ipv6(Ipv6Address(addr.octets())), Extent::Prefix(len)),
                    Err(_) => (Start::Ipv6Pattern(pattern::normalize(fields[4])?), Extent::Prefix(len)),
                }
            }
            Family::Asn => (Start::Asn(codec::parse_asn(fields[4])?), Extent::Single),
        };

        let date = if fields[6].is_empty() { None } else { Some(fields[6].to_string()) };
        let (status, dst_registry) = if fields[7].is_empty() {
            (None, None)
        } else if registry == Registry::Iana {
            (Some(Status::Assigned), Some(Registry::from_str(fields[7])?))
        } else {
            (Some(Status::from_str(fields[7])?), None)
        };

        Ok(DelegationRecord { registry, country, start, extent, date, status, dst_registry, source })
    }
}
