use smoltcp::wire::{Ipv4Address, Ipv6Address};

use crate::codec;
use crate::error::{Error, Result};
use crate::pattern;
use crate::record::{DelegationRecord, Extent, Family, Source, Start};
use crate::{CountryCode, Registry, Status, DELEGATION_FILES};

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};


/// Outcome of reading one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Record(DelegationRecord),
    /// A well-formed line that carries no allocation (header, summary,
    /// no country attributed).
    Discarded,
    /// Nothing to do with records at all (attributes, blank lines).
    Ignored,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub parsed: usize,
    pub discarded: usize,
    pub skipped: usize,
}

impl ParseReport {
    pub fn merge(&mut self, other: &ParseReport) {
        self.parsed += other.parsed;
        self.discarded += other.discarded;
        self.skipped += other.skipped;
    }

    /// `line_no` is 1-based, as editors show it.
    fn count(&mut self, line_no: usize, result: Result<Parsed>, records: &mut Vec<DelegationRecord>) {
        match result {
            Ok(Parsed::Record(record)) => {
                self.parsed += 1;
                records.push(record);
            }
            Ok(Parsed::Discarded) => self.discarded += 1,
            Ok(Parsed::Ignored) => {}
            Err(e) => {
                debug!("Skip line#{}: {}", line_no, e);
                self.skipped += 1;
            }
        }
    }
}


fn is_wildcard(cc: &str) -> bool {
    cc.is_empty() || cc == "*"
}

/// One line of a `delegated-<rir>[-extended]-latest` file:
///
/// `registry|cc|type|start|value|date|status[|opaque-id[|extensions]]`
pub fn parse_rir_line(line: &str) -> Result<Parsed> {
    let fields: Vec<&str> = line.trim_end().split('|').map(str::trim).collect();
    if fields.len() < 7 {
        return Err(Error::ParseRecordError(format!("less than 7 fields: {}", line)));
    }

    // Version headers carry a numeric version where the registry goes.
    if !fields[0].is_empty() && fields[0].bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Ok(Parsed::Discarded);
    }
    if is_wildcard(fields[1]) {
        return Ok(Parsed::Discarded);
    }

    let registry = Registry::from_str(fields[0])?;
    let country = CountryCode::from_str(fields[1])?;
    let family = Family::from_str(fields[2])?;

    let (start, extent) = match family {
        Family::Ipv4 => {
            let start = codec::ip_to_int(fields[3])?;
            let hosts = u64::from_str(fields[4])
                .map_err(|_| Error::ParseRecordError(format!("bad host count: {}", fields[4])))?;
            if hosts == 0 || hosts > codec::IPV4_SPACE {
                return Err(Error::InvalidHostCount(hosts));
            }
            (Start::Ipv4(Ipv4Address(Ipv4Addr::from(start).octets())), Extent::Hosts(hosts))
        }
        Family::Ipv6 => {
            let start = Ipv6Addr::from_str(fields[3])
                .map_err(|_| Error::MalformedAddress(fields[3].to_string()))?;
            let prefix_len = u8::from_str(fields[4])
                .map_err(|_| Error::ParseRecordError(format!("bad prefix length: {}", fields[4])))?;
            if prefix_len > 128 {
                return Err(Error::ParseRecordError(format!("bad prefix length: {}", prefix_len)));
            }
            (Start::Ipv6(Ipv6Address(start.octets())), Extent::Prefix(prefix_len))
        }
        Family::Asn => (Start::Asn(codec::parse_asn(fields[3])?), Extent::Single),
    };

    let date = if fields[5].is_empty() { None } else { Some(fields[5].to_string()) };
    let (status, dst_registry) = if registry == Registry::Iana {
        (Some(Status::Assigned), Some(Registry::from_str(fields[6])?))
    } else {
        (Some(Status::from_str(fields[6])?), None)
    };

    Ok(Parsed::Record(DelegationRecord {
        registry,
        country,
        start,
        extent,
        date,
        status,
        dst_registry,
        source: Source::Rir,
    }))
}

/// Every allocation in a registry's delegated file.
///
/// Comment and summary lines are passed over and the version header is
/// discarded by its numeric registry field; lines that fail to parse are
/// counted in `report` and skipped.
pub fn parse_rir(content: &str, report: &mut ParseReport) -> Vec<DelegationRecord> {
    let mut records = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        if line.starts_with('#') || line.trim().is_empty() {
            trace!("Ignore comment line#{}", line_no);
            continue;
        }

        if line.trim_end().ends_with("summary") {
            trace!("Ignore summary line#{}", line_no);
            report.discarded += 1;
            continue;
        }

        report.count(line_no, parse_rir_line(line), &mut records);
    }

    records
}


#[derive(Debug, Clone)]
enum Pending {
    Ipv4 { first: u32, hosts: u64 },
    Ipv6(Start, Extent),
}

/// Line-at-a-time reader for RPSL database dumps (`inetnum`/`inet6num`
/// objects) published by local registries.
///
/// An object's range is remembered until its `country:` attribute, which
/// yields the record.
#[derive(Debug, Clone)]
pub struct LirParser {
    registry: Registry,
    pending: Option<Pending>,
}

impl LirParser {
    pub fn new(registry: Registry) -> Self {
        LirParser { registry, pending: None }
    }

    pub fn feed(&mut self, line: &str) -> Result<Parsed> {
        let line = line.trim_end();
        if line.trim().is_empty() {
            self.pending = None;
            return Ok(Parsed::Ignored);
        }
        if line.starts_with('%') || line.starts_with('#') {
            return Ok(Parsed::Ignored);
        }

        let mut parts = line.splitn(2, ':');
        let key = parts.next().unwrap_or("").trim().to_ascii_lowercase();
        let value = match parts.next() {
            Some(value) => value.trim(),
            None => return Ok(Parsed::Ignored),
        };

        match key.as_str() {
            "inetnum" => {
                self.pending = None;
                let (first, hosts) = codec::parse_inetnum_range(value)?;
                let first = codec::ip_to_int(&first)?;
                self.pending = Some(Pending::Ipv4 { first, hosts });
                Ok(Parsed::Ignored)
            }
            "inet6num" => {
                self.pending = None;
                self.pending = Some(parse_inet6num(value)?);
                Ok(Parsed::Ignored)
            }
            "country" => {
                let pending = self.pending.take()
                    .ok_or_else(|| Error::ParseRecordError(format!("country without inetnum: {}", value)))?;
                let cc = value.split_whitespace().next().unwrap_or("");
                if is_wildcard(cc) {
                    return Ok(Parsed::Discarded);
                }
                let country = CountryCode::from_str(cc)?;
                let (start, extent) = match pending {
                    Pending::Ipv4 { first, hosts } => {
                        (Start::Ipv4(Ipv4Address(Ipv4Addr::from(first).octets())), Extent::Hosts(hosts))
                    }
                    Pending::Ipv6(start, extent) => (start, extent),
                };
                Ok(Parsed::Record(DelegationRecord::new(self.registry, country, start, extent, Source::Lir)))
            }
            _ => Ok(Parsed::Ignored),
        }
    }
}

/// `addr/len`, or a bare address kept as a group pattern.
fn parse_inet6num(value: &str) -> Result<Pending> {
    let mut parts = value.splitn(2, '/');
    let addr = parts.next().unwrap_or("").trim();
    match parts.next() {
        Some(len) => {
            let start = Ipv6Addr::from_str(addr).map_err(|_| Error::MalformedAddress(addr.to_string()))?;
            let prefix_len = u8::from_str(len.trim())
                .map_err(|_| Error::ParseRecordError(format!("bad prefix length: {}", len)))?;
            if prefix_len > 128 {
                return Err(Error::ParseRecordError(format!("bad prefix length: {}", prefix_len)));
            }
            Ok(Pending::Ipv6(Start::Ipv6(Ipv6Address(start.octets())), Extent::Prefix(prefix_len)))
        }
        None => {
            let pattern = pattern::normalize(addr)?;
            let len = (16 * pattern::group_count(&pattern)) as u8;
            Ok(Pending::Ipv6(Start::Ipv6Pattern(pattern), Extent::Prefix(len)))
        }
    }
}

/// Every `inetnum`/`inet6num` object with a country in an RPSL dump.
pub fn parse_lir(content: &str, registry: Registry, report: &mut ParseReport) -> Vec<DelegationRecord> {
    let mut parser = LirParser::new(registry);
    let mut records = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let result = parser.feed(line);
        report.count(line_idx + 1, result, &mut records);
    }

    records
}


/// Parses every well-known delegated file present in `data_path`.
///
/// Records repeated across files (plain and extended variants of the same
/// registry) are kept once, in first-seen order.
pub fn parse_dir(data_path: &Path) -> (Vec<DelegationRecord>, ParseReport) {
    let mut records = Vec::new();
    let mut seen: HashSet<DelegationRecord> = HashSet::new();
    let mut total = ParseReport::default();

    if !data_path.exists() {
        debug!("Path {:?} not exists", data_path);
        return (records, total);
    }

    for filename in DELEGATION_FILES.iter() {
        let filepath = data_path.join(filename);
        if !filepath.is_file() {
            debug!("FilePath {:?} not exists.", &filepath);
            continue;
        }

        info!("Parse {:?} ...", filepath);
        let content = match fs::read_to_string(&filepath) {
            Ok(content) => content,
            Err(e) => {
                error!("Read {:?} failed: {}", &filepath, e);
                continue;
            }
        };

        let mut report = ParseReport::default();
        for record in parse_rir(&content, &mut report) {
            if seen.insert(record.clone()) {
                records.push(record);
            }
        }
        info!("{:?}: {} records, {} discarded, {} skipped",
              filename, report.parsed, report.discarded, report.skipped);
        total.merge(&report);
    }

    (records, total)
}

pub fn parse_lir_file(path: &Path, registry: Registry) -> Result<(Vec<DelegationRecord>, ParseReport)> {
    let content = fs::read_to_string(path)?;
    let mut report = ParseReport::default();
    let records = parse_lir(&content, registry, &mut report);
    info!("{:?}: {} records, {} discarded, {} skipped",
          path, report.parsed, report.discarded, report.skipped);

    Ok((records, report))
}
