use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::fmt;

use crate::error::{Error, Result};


/// Name of the ISO 3166 code list looked for next to the delegation files.
pub const COUNTRY_CODES_FILE: &str = "countrycodes.txt";


/// Two-letter country code as published in the delegation files.
///
/// Stored upper-cased so `"mm"` and `"MM"` name the same country.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    pub fn name<'a>(&self, names: &'a CountryNames) -> Option<&'a str> {
        names.name(self)
    }
}

impl FromStr for CountryCode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::ParseCountryError(format!("Unknown Country Code ({})", s)));
        }

        Ok(CountryCode([bytes[0].to_ascii_uppercase(), bytes[1].to_ascii_uppercase()]))
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}


/// Country names by code and codes by name, read from an ISO 3166 list of
/// `NAME;CC` lines.
#[derive(Debug, Clone, Default)]
pub struct CountryNames {
    names: HashMap<CountryCode, String>,
    codes: HashMap<String, CountryCode>,
}

impl CountryNames {
    /// Lines without a `;` and a valid trailing code (the list's preamble,
    /// blank lines) are passed over.
    pub fn parse(content: &str) -> CountryNames {
        let mut table = CountryNames::default();

        for (line_idx, line) in content.lines().enumerate() {
            let mut parts = line.trim().rsplitn(2, ';');
            let code = parts.next().unwrap_or("");
            let name = match parts.next() {
                Some(name) if !name.trim().is_empty() => name.trim(),
                _ => {
                    trace!("Ignore country list line#{}", line_idx + 1);
                    continue;
                }
            };
            match CountryCode::from_str(code) {
                Ok(country) => table.insert(country, name),
                Err(e) => debug!("Skip country list line#{}: {}", line_idx + 1, e),
            }
        }

        table
    }

    pub fn load(path: &Path) -> Result<CountryNames> {
        let table = CountryNames::parse(&fs::read_to_string(path)?);
        info!("Loaded {} country names from {:?}", table.len(), path);

        Ok(table)
    }

    pub fn insert(&mut self, country: CountryCode, name: &str) {
        self.codes.insert(name.to_uppercase(), country);
        self.names.insert(country, name.to_string());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, country: &CountryCode) -> Option<&str> {
        self.names.get(country).map(String::as_str)
    }

    /// Case-insensitive match on the full name.
    pub fn code(&self, name: &str) -> Option<CountryCode> {
        self.codes.get(&name.trim().to_uppercase()).cloned()
    }

    /// Accepts either a two-letter code or a country name.
    pub fn resolve(&self, text: &str) -> Result<CountryCode> {
        if let Ok(country) = CountryCode::from_str(text) {
            return Ok(country);
        }
        self.code(text)
            .ok_or_else(|| Error::ParseCountryError(format!("Unknown Country ({})", text.trim())))
    }
}

#[test]
fn test_country_code() {
    assert_eq!("mm".parse::<CountryCode>().unwrap().to_string(), "MM");
    assert_eq!("KP".parse::<CountryCode>().unwrap(), "kp".parse::<CountryCode>().unwrap());
    assert!("*".parse::<CountryCode>().is_err());
    assert!("".parse::<CountryCode>().is_err());
    assert!("USA".parse::<CountryCode>().is_err());
    assert!("1A".parse::<CountryCode>().is_err());
}


#[test]
fn test_country_names() {
    let names = CountryNames::parse("\
This list states the country names (official short names in English) in alphabetical order
\r
FINLAND;FI\r
KOREA, DEMOCRATIC PEOPLE'S REPUBLIC OF;KP\r
MYANMAR;MM\r
NOWHERE;N1\r
;NZ
");
    assert_eq!(names.len(), 3);

    let mm: CountryCode = "MM".parse().unwrap();
    assert_eq!(mm.name(&names), Some("MYANMAR"));
    assert_eq!(names.name(&"kp".parse().unwrap()), Some("KOREA, DEMOCRATIC PEOPLE'S REPUBLIC OF"));
    assert_eq!(names.name(&"NZ".parse().unwrap()), None);
    assert_eq!(names.code("Myanmar"), Some(mm));
    assert_eq!(names.code(" korea, democratic people's republic of "), Some("KP".parse().unwrap()));

    assert_eq!(names.resolve("myanmar"), Ok(mm));
    assert_eq!(names.resolve("mm"), Ok(mm));
    assert_eq!(names.resolve("fi").unwrap().as_str(), "FI");
    assert!(names.resolve("Atlantis").is_err());
    assert!(CountryNames::default().resolve("Myanmar").is_err());
}
