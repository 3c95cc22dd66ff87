//! Offline "who holds this address space" answers from RIR and LIR
//! delegation data.
//!
//! Delegation files are parsed into [`DelegationRecord`]s, which are built
//! into an immutable [`RangeIndex`]. The index answers point queries for
//! IPv4, IPv6 and ASNs and lists the CIDR blocks a country holds.

#[macro_use]
extern crate log;
extern crate arc_swap;
extern crate smoltcp;


mod country;
mod registry;
mod status;
mod error;

pub mod cidr;
pub mod codec;
pub mod global;
pub mod index;
pub mod parse;
pub mod pattern;
pub mod precedence;
pub mod record;
pub mod store;


pub use country::{CountryCode, CountryNames, COUNTRY_CODES_FILE};
pub use registry::Registry;
pub use status::Status;
pub use error::{Error, Result};

pub use cidr::{range_to_cidrs, Cidr};
pub use codec::{int_to_ip, ip_to_int, parse_inetnum_range, subnet_prefix_for_host_count};
pub use index::{build_index, cidrs_for_country, lookup, BuildReport, Owner, RangeIndex, Span};
pub use parse::{parse_dir, parse_lir, parse_rir, LirParser, ParseReport};
pub use precedence::OverlapConflict;
pub use record::{DelegationRecord, Extent, Family, Source, Start};
pub use store::{FileStore, Store};


/// File names, as published by the registries, that [`parse_dir`] reads.
pub const DELEGATION_FILES: [&str; 10] = [
    "delegated-arin-extended-latest",
    "delegated-ripencc-latest",
    "delegated-ripencc-extended-latest",
    "delegated-apnic-latest",
    "delegated-apnic-extended-latest",
    "delegated-lacnic-latest",
    "delegated-lacnic-extended-latest",
    "delegated-afrinic-latest",
    "delegated-afrinic-extended-latest",
    "delegated-iana-latest",
];
