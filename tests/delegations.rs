extern crate blockfinder;

use blockfinder::{
    cidrs_for_country, parse, CountryNames, Family, FileStore, ParseReport, RangeIndex, Registry, Source, Store,
    COUNTRY_CODES_FILE,
};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;


fn data_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn load() -> Vec<blockfinder::DelegationRecord> {
    let (mut records, _) = parse::parse_dir(&data_path());
    let (lir, _) = parse::parse_lir_file(&data_path().join("ripe.db.inetnum"), Registry::Ripencc).unwrap();
    records.extend(lir);
    records
}

fn cidrs(index: &RangeIndex, family: Family, cc: &str) -> Vec<String> {
    cidrs_for_country(index, family, cc)
        .unwrap()
        .iter()
        .map(|cidr| cidr.to_string())
        .collect()
}

fn country(index: &RangeIndex, query: &str) -> Option<String> {
    index.lookup_str(query).unwrap().map(|owner| owner.country.to_string())
}


#[test]
fn test_parse_data_dir() {
    let (records, report) = parse::parse_dir(&data_path());
    // The plain ripencc file repeats five allocations of the extended one.
    assert_eq!(records.len(), 21);
    assert_eq!(report, ParseReport { parsed: 26, discarded: 13, skipped: 1 });
    assert!(records.iter().all(|record| record.source == Source::Rir));

    let (lir, report) = parse::parse_lir_file(&data_path().join("ripe.db.inetnum"), Registry::Ripencc).unwrap();
    assert_eq!(lir.len(), 6);
    assert_eq!(report, ParseReport { parsed: 6, discarded: 0, skipped: 0 });
    assert_eq!(lir.iter().filter(|record| record.is_pattern()).count(), 1);

    assert!(parse::parse_lir_file(&data_path().join("missing.db"), Registry::Ripencc).is_err());
    assert_eq!(parse::parse_dir(&data_path().join("missing")).0.len(), 0);
}

#[test]
fn test_country_blocks() {
    let (index, report) = RangeIndex::build(load());
    assert!(report.conflicts.is_empty());
    assert_eq!(report.unbounded, 0);

    assert_eq!(cidrs(&index, Family::Ipv4, "MM"), vec!["203.81.64.0/19", "203.81.160.0/20"]);
    assert_eq!(cidrs(&index, Family::Ipv4, "KP"), vec!["175.45.176.0/22"]);
    assert_eq!(cidrs(&index, Family::Ipv4, "th"), vec!["203.81.96.0/19"]);
    assert_eq!(cidrs(&index, Family::Ipv4, "DE"), vec!["213.95.0.0/16"]);
    assert_eq!(cidrs(&index, Family::Ipv4, "FR"), vec!["80.16.0.0/24"]);
    assert_eq!(cidrs(&index, Family::Ipv6, "JP"), vec!["2001:200::/32", "2001:218::/32"]);
    assert_eq!(cidrs(&index, Family::Ipv6, "FI"), vec!["2001:670:85::/48"]);
    let eu = cidrs(&index, Family::Ipv6, "EU");
    assert!(!eu.contains(&"2001:670::/29".to_string()));
    assert!(!eu.contains(&"2001:658::/29".to_string()));
    assert!(eu.contains(&"2001:670:86::/47".to_string()));
    assert!(cidrs(&index, Family::Ipv4, "US").is_empty());
    assert!(cidrs_for_country(&index, Family::Ipv4, "M1").is_err());

    let italy = cidrs(&index, Family::Ipv4, "IT");
    assert_eq!(italy.len(), 12);
    assert_eq!(italy.first().map(String::as_str), Some("80.16.1.0/24"));
    assert_eq!(italy.last().map(String::as_str), Some("80.24.0.0/13"));

    assert_eq!(index.asns_for_country(&"DE".parse().unwrap()), vec![3320]);
    assert_eq!(index.asns_for_country(&"JP".parse().unwrap()), vec![173]);
}

#[test]
fn test_reverse_lookups() {
    let (index, _) = RangeIndex::build(load());

    assert_eq!(country(&index, "203.81.64.1").as_deref(), Some("MM"));
    assert_eq!(country(&index, "203.81.95.255").as_deref(), Some("MM"));
    assert_eq!(country(&index, "203.81.192.1"), None);
    assert_eq!(country(&index, "193.9.25.10").as_deref(), Some("PL"));
    assert_eq!(country(&index, "193.9.27.255").as_deref(), Some("HU"));
    assert_eq!(country(&index, "1.1.1.1"), None);

    // Local registry objects win over the regional allocation around them.
    let owner = index.lookup_str("80.16.0.10").unwrap().unwrap();
    assert_eq!(owner.country.as_str(), "FR");
    assert_eq!(owner.source, Source::Lir);
    assert_eq!(country(&index, "80.16.1.0").as_deref(), Some("IT"));
    assert_eq!(country(&index, "80.16.151.184").as_deref(), Some("IT"));

    assert_eq!(country(&index, "2001:200:1234::1").as_deref(), Some("JP"));
    assert_eq!(country(&index, "2001:658:21a::1").as_deref(), Some("DE"));
    assert_eq!(country(&index, "2001:658:21b::1").as_deref(), Some("EU"));
    assert_eq!(country(&index, "2001:670:85:1::").as_deref(), Some("FI"));
    assert_eq!(country(&index, "2001:670:86::").as_deref(), Some("EU"));
    assert_eq!(country(&index, "2001:300::"), None);

    assert_eq!(country(&index, "AS681").as_deref(), Some("NZ"));
    assert_eq!(country(&index, "4608").as_deref(), Some("AU"));
    assert_eq!(country(&index, "65000"), None);

    assert!(index.lookup_str("203.81.64").is_err());
    assert!(index.lookup_str("2001:zz::").is_err());
}

#[test]
fn test_store_snapshot_rebuilds_same_index() {
    let records = load();
    let dir = env::temp_dir().join(format!("blockfinder-it-{}", process::id()));
    fs::create_dir_all(&dir).unwrap();

    let store = FileStore::new(dir.join("records"));
    store.save(&records).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, records);

    let (from_files, _) = RangeIndex::build(records);
    let (from_store, _) = RangeIndex::build(loaded);
    for &family in [Family::Ipv4, Family::Ipv6, Family::Asn].iter() {
        assert_eq!(from_files.spans(family), from_store.spans(family));
    }
    assert_eq!(cidrs(&from_store, Family::Ipv4, "MM"), vec!["203.81.64.0/19", "203.81.160.0/20"]);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_every_listed_block_looks_up_to_its_country() {
    let (index, _) = RangeIndex::build(load());
    for &family in [Family::Ipv4, Family::Ipv6].iter() {
        for span in index.spans(family) {
            for cidr in index.cidrs_for_country(family, &span.country) {
                let owner = index.lookup(family, cidr.network()).map(|owner| owner.country);
                assert_eq!(owner, Some(span.country), "{} listed for {}", cidr, span.country);
                let owner = index.lookup(family, cidr.last()).map(|owner| owner.country);
                assert_eq!(owner, Some(span.country), "{} listed for {}", cidr, span.country);
            }
        }
    }
    for span in index.spans(Family::Asn) {
        for asn in index.asns_for_country(&span.country) {
            assert_eq!(index.lookup_asn(asn).map(|owner| owner.country), Some(span.country));
        }
    }
}

#[test]
fn test_country_names() {
    let names = CountryNames::load(&data_path().join(COUNTRY_CODES_FILE)).unwrap();
    assert_eq!(names.len(), 12);

    let (index, _) = RangeIndex::build(load());
    let country = names.resolve("Myanmar").unwrap();
    let blocks: Vec<String> = index.cidrs_for_country(Family::Ipv4, &country).iter().map(|c| c.to_string()).collect();
    assert_eq!(blocks, vec!["203.81.64.0/19", "203.81.160.0/20"]);

    let owner = index.lookup_str("175.45.176.100").unwrap().unwrap();
    assert_eq!(owner.country.name(&names), Some("KOREA, DEMOCRATIC PEOPLE'S REPUBLIC OF"));
    let owner = index.lookup_str("2001:658:21a::1").unwrap().unwrap();
    assert_eq!(owner.country.name(&names), Some("GERMANY"));
    let owner = index.lookup_str("2001:658:21b::1").unwrap().unwrap();
    assert_eq!(owner.country.name(&names), None);

    assert!(CountryNames::load(&data_path().join("missing.txt")).is_err());
}
