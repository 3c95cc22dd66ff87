//! Per-family range index answering point queries by binary search.

use std::cmp::{Ordering, Reverse};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::cidr::{self, Cidr};
use crate::codec;
use crate::error::Result;
use crate::precedence::{self, OverlapConflict};
use crate::record::{DelegationRecord, Family, Source};
use crate::{CountryCode, Registry};


/// One owned range, bounds inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub first: u128,
    pub last: u128,
    pub country: CountryCode,
    pub registry: Registry,
    pub source: Source,
}

impl Span {
    pub fn from_record(record: &DelegationRecord) -> Option<Span> {
        let (first, last) = record.bounds()?;
        Some(Span {
            first,
            last,
            country: record.country,
            registry: record.registry,
            source: record.source,
        })
    }

    pub fn contains(&self, key: u128) -> bool {
        self.first <= key && key <= self.last
    }

    /// `None` when the span runs to the very end of IPv6 space.
    pub fn end_exclusive(&self) -> Option<u128> {
        self.last.checked_add(1)
    }

    pub fn owner(&self) -> Owner {
        Owner { country: self.country, registry: self.registry, source: self.source }
    }

    pub fn display_bounds(&self, family: Family) -> String {
        match family {
            Family::Ipv4 => format!("{} - {}", Ipv4Addr::from(self.first as u32), Ipv4Addr::from(self.last as u32)),
            Family::Ipv6 => format!("{} - {}", Ipv6Addr::from(self.first), Ipv6Addr::from(self.last)),
            Family::Asn => format!("AS{} - AS{}", self.first, self.last),
        }
    }
}


/// Who holds a looked-up address or ASN.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Owner {
    pub country: CountryCode,
    pub registry: Registry,
    pub source: Source,
}


#[derive(Debug, Clone, Default)]
struct FamilyIndex {
    spans: Vec<Span>,
}

impl FamilyIndex {
    fn find(&self, key: u128) -> Option<&Span> {
        self.spans
            .binary_search_by(|span| {
                if span.last < key {
                    Ordering::Less
                } else if span.first > key {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .ok()
            .map(|i| &self.spans[i])
    }
}


#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Records that became spans.
    pub indexed: usize,
    /// IPv6 prefix patterns among them.
    pub patterns: usize,
    /// Records whose extent could not be turned into bounds.
    pub unbounded: usize,
    pub conflicts: Vec<OverlapConflict>,
}


/// Immutable lookup structure, one sorted span list per family.
///
/// IPv6 prefix patterns are carved in like any other range, so a pattern
/// owns exactly the addresses whose leading groups match it.
#[derive(Debug, Clone, Default)]
pub struct RangeIndex {
    ipv4: FamilyIndex,
    ipv6: FamilyIndex,
    asn: FamilyIndex,
}

impl RangeIndex {
    pub fn build<I>(records: I) -> (RangeIndex, BuildReport)
        where I: IntoIterator<Item = DelegationRecord>
    {
        let mut report = BuildReport::default();
        let mut rir: [Vec<Span>; 3] = Default::default();
        let mut lir: [Vec<Span>; 3] = Default::default();

        for record in records {
            match Span::from_record(&record) {
                Some(span) => {
                    if record.is_pattern() {
                        report.patterns += 1;
                    }
                    let slot = slot(record.family());
                    match record.source {
                        Source::Rir => rir[slot].push(span),
                        Source::Lir => lir[slot].push(span),
                    }
                    report.indexed += 1;
                }
                None => {
                    debug!("No usable bounds for {}", record);
                    report.unbounded += 1;
                }
            }
        }

        let mut index = RangeIndex::default();
        for &family in [Family::Ipv4, Family::Ipv6, Family::Asn].iter() {
            let slot = slot(family);
            let mut rir_spans = ::std::mem::replace(&mut rir[slot], Vec::new());
            let lir_spans = ::std::mem::replace(&mut lir[slot], Vec::new());
            // IANA's coarse blocks go underneath the registries' own data,
            // and a wider span is painted before the spans nested in it.
            // Stable, so equal keys keep load order.
            rir_spans.sort_by_key(|span| (span.registry != Registry::Iana, span.first, Reverse(span.last)));

            let (spans, conflicts) = precedence::resolve(family, rir_spans, lir_spans);
            report.conflicts.extend(conflicts);
            index.family_mut(family).spans = spans;
        }

        info!("Built index: {} ipv4, {} ipv6 ({} from patterns), {} asn ranges; {} LIR conflicts",
              index.ipv4.spans.len(),
              index.ipv6.spans.len(),
              report.patterns,
              index.asn.spans.len(),
              report.conflicts.len());

        (index, report)
    }

    fn family(&self, family: Family) -> &FamilyIndex {
        match family {
            Family::Ipv4 => &self.ipv4,
            Family::Ipv6 => &self.ipv6,
            Family::Asn => &self.asn,
        }
    }

    fn family_mut(&mut self, family: Family) -> &mut FamilyIndex {
        match family {
            Family::Ipv4 => &mut self.ipv4,
            Family::Ipv6 => &mut self.ipv6,
            Family::Asn => &mut self.asn,
        }
    }

    /// Owner of `key` (an address or ASN as integer), `None` when no range
    /// covers it.
    pub fn lookup(&self, family: Family, key: u128) -> Option<Owner> {
        self.family(family).find(key).map(Span::owner)
    }

    pub fn lookup_address(&self, address: &IpAddr) -> Option<Owner> {
        match *address {
            IpAddr::V4(v4) => self.lookup(Family::Ipv4, u32::from(v4) as u128),
            IpAddr::V6(v6) => self.lookup(Family::Ipv6, u128::from(v6)),
        }
    }

    pub fn lookup_asn(&self, asn: u32) -> Option<Owner> {
        self.lookup(Family::Asn, asn as u128)
    }

    /// Looks up an IPv4 address, IPv6 address or ASN given as text.
    ///
    /// Unparseable input is an error; a valid query nobody holds is `Ok(None)`.
    pub fn lookup_str(&self, text: &str) -> Result<Option<Owner>> {
        let text = text.trim();
        if text.contains(':') {
            Ok(self.lookup(Family::Ipv6, codec::ipv6_to_int(text)?))
        } else if text.contains('.') {
            Ok(self.lookup(Family::Ipv4, codec::ip_to_int(text)? as u128))
        } else {
            Ok(self.lookup_asn(codec::parse_asn(text)?))
        }
    }

    pub fn spans(&self, family: Family) -> &[Span] {
        &self.family(family).spans
    }

    pub fn len(&self, family: Family) -> usize {
        self.family(family).spans.len()
    }

    pub fn is_empty(&self) -> bool {
        [Family::Ipv4, Family::Ipv6, Family::Asn].iter().all(|&family| self.len(family) == 0)
    }

    /// Minimal CIDR list for everything `country` holds in `family`.
    ///
    /// Adjacent allocations are merged first, so many small neighbouring
    /// delegations come out as a few large blocks. ASNs have no CIDR form
    /// and give an empty list; see [`RangeIndex::asns_for_country`].
    pub fn cidrs_for_country(&self, family: Family, country: &CountryCode) -> Vec<Cidr> {
        if family == Family::Asn {
            return Vec::new();
        }

        let owned = self.family(family).spans
            .iter()
            .filter(|span| span.country == *country);

        cidr::merge_spans(owned)
            .into_iter()
            .flat_map(|(first, last)| cidr::range_to_cidrs(family, first, last))
            .collect()
    }

    /// ASNs held by `country`, ascending.
    pub fn asns_for_country(&self, country: &CountryCode) -> Vec<u32> {
        self.asn.spans
            .iter()
            .filter(|span| span.country == *country)
            .flat_map(|span| span.first..=span.last)
            .map(|asn| asn as u32)
            .collect()
    }
}

fn slot(family: Family) -> usize {
    match family {
        Family::Ipv4 => 0,
        Family::Ipv6 => 1,
        Family::Asn => 2,
    }
}


/// Builds an index, discarding the build report.
pub fn build_index<I>(records: I) -> RangeIndex
    where I: IntoIterator<Item = DelegationRecord>
{
    RangeIndex::build(records).0
}

pub fn lookup(index: &RangeIndex, family: Family, key: u128) -> Option<CountryCode> {
    index.lookup(family, key).map(|owner| owner.country)
}

pub fn cidrs_for_country(index: &RangeIndex, family: Family, country_code: &str) -> Result<Vec<Cidr>> {
    let country = CountryCode::from_str(country_code)?;
    Ok(index.cidrs_for_country(family, &country))
}
