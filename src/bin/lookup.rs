#[macro_use]
extern crate log;
extern crate env_logger;
extern crate clap;

extern crate blockfinder;

/**
    $ lookup --data-path data --country MM --family ipv4
    $ lookup --data-path data --country Myanmar --family ipv6
    $ lookup --data-path data --lir-file data/ripe.db.inetnum --reverse 80.16.151.184
    $ lookup --data-path data --store data/records --save
    $ lookup --store data/records --reverse AS681
**/

use blockfinder::{
    global, parse, CountryNames, DelegationRecord, Family, FileStore, Registry, Store, COUNTRY_CODES_FILE,
};

use std::env;
use std::path::Path;
use std::process;
use std::str::FromStr;


fn load_records(data_path: &Path, lir_file: Option<&str>, store: Option<&FileStore>) -> Result<Vec<DelegationRecord>, String> {
    let (mut records, report) = parse::parse_dir(data_path);
    info!("RIR files: {} records, {} discarded, {} skipped", report.parsed, report.discarded, report.skipped);

    if let Some(lir_file) = lir_file {
        let (lir_records, _) = parse::parse_lir_file(Path::new(lir_file), Registry::Ripencc)
            .map_err(|e| format!("{}: {}", lir_file, e))?;
        records.extend(lir_records);
    }

    if records.is_empty() {
        if let Some(store) = store {
            info!("No delegation files in {:?}, reading {:?}", data_path, store.path());
            return store.load().map_err(|e| e.to_string());
        }
    }

    Ok(records)
}

fn load_country_names(data_path: &Path) -> CountryNames {
    let path = data_path.join(COUNTRY_CODES_FILE);
    if !path.is_file() {
        debug!("FilePath {:?} not exists, country names unavailable", path);
        return CountryNames::default();
    }

    match CountryNames::load(&path) {
        Ok(names) => names,
        Err(e) => {
            warn!("Read {:?} failed: {}", path, e);
            CountryNames::default()
        }
    }
}

fn run() -> Result<(), String> {
    use clap::{App, Arg};

    let app = App::new("blockfinder lookup")
        .version("0.1")
        .about("Answer who holds an address, IPv6 prefix or ASN from RIR/LIR delegation files")
        .arg(
            Arg::with_name("data-path")
                .long("data-path")
                .required(false)
                .default_value("data")
                .help("Directory holding the delegated-*-latest files")
        )
        .arg(
            Arg::with_name("lir-file")
                .long("lir-file")
                .takes_value(true)
                .help("RPSL inetnum/inet6num dump with more specific allocations")
        )
        .arg(
            Arg::with_name("store")
                .long("store")
                .takes_value(true)
                .help("Normalized record file, read when no delegation files are found")
        )
        .arg(
            Arg::with_name("save")
                .long("save")
                .requires("store")
                .help("Write the parsed records to --store")
        )
        .arg(
            Arg::with_name("country")
                .long("country")
                .short("c")
                .takes_value(true)
                .help("List the blocks held by this country, by code or name")
        )
        .arg(
            Arg::with_name("family")
                .long("family")
                .short("t")
                .possible_values(&["ipv4", "ipv6", "asn"])
                .default_value("ipv4")
                .help("Resource type listed by --country")
        )
        .arg(
            Arg::with_name("reverse")
                .long("reverse")
                .short("r")
                .takes_value(true)
                .multiple(true)
                .help("Address or ASN to look up")
        );

    let matches = app.get_matches();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "lookup=info,blockfinder=info");
    }
    env_logger::init();

    let data_path = Path::new(matches.value_of("data-path").unwrap_or("data")).to_path_buf();
    let store = matches.value_of("store").map(FileStore::new);

    let records = load_records(&data_path, matches.value_of("lir-file"), store.as_ref())?;
    if records.is_empty() {
        return Err(format!("no delegation records found in {:?}", data_path));
    }

    if matches.is_present("save") {
        if let Some(ref store) = store {
            store.save(&records).map_err(|e| e.to_string())?;
        }
    }

    let report = global::rebuild(records);
    if !report.conflicts.is_empty() {
        warn!("{} overlapping LIR objects resolved", report.conflicts.len());
    }
    let index = global::current().ok_or("index not installed")?;
    let names = load_country_names(&data_path);

    if let Some(cc) = matches.value_of("country") {
        let country = names.resolve(cc).map_err(|e| e.to_string())?;
        let family = Family::from_str(matches.value_of("family").unwrap_or("ipv4")).map_err(|e| e.to_string())?;
        if family == Family::Asn {
            for asn in index.asns_for_country(&country) {
                println!("AS{}", asn);
            }
        } else {
            for cidr in index.cidrs_for_country(family, &country) {
                println!("{}", cidr);
            }
        }
    }

    if let Some(queries) = matches.values_of("reverse") {
        for query in queries {
            match index.lookup_str(query) {
                Ok(Some(owner)) => match owner.country.name(&names) {
                    Some(name) => println!("{} {} ({}) {}", query, owner.country, name, owner.registry),
                    None => println!("{} {} {}", query, owner.country, owner.registry),
                },
                Ok(None) => println!("{} not found", query),
                Err(e) => error!("{}", e),
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("[ERROR] {}", e);
        process::exit(1);
    }
}
