use std::error;
use std::fmt;
use std::io;


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MalformedAddress(String),
    InvalidHostCount(u64),
    MalformedRange(String),
    ParseStatusError(String),
    ParseCountryError(String),
    ParseRegistryError(String),
    ParseRecordError(String),
    Io(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MalformedAddress(ref s) => write!(f, "malformed address: {}", s),
            Error::InvalidHostCount(n) => write!(f, "invalid host count: {}", n),
            Error::MalformedRange(ref s) => write!(f, "malformed range: {}", s),
            Error::ParseStatusError(ref s) => write!(f, "{}", s),
            Error::ParseCountryError(ref s) => write!(f, "{}", s),
            Error::ParseRegistryError(ref s) => write!(f, "{}", s),
            Error::ParseRecordError(ref s) => write!(f, "bad record: {}", s),
            Error::Io(ref s) => write!(f, "io: {}", s),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
