use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    /// Named device is not provided by the host.
    DeviceNotFound(String),
    /// Record could not be written.
    Record(io::Error),
    /// Configuration file could not be read.
    ConfigIo(io::Error),
    /// Configuration file is invalid.
    ConfigParse(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DeviceNotFound(name) => write!(f, "device not found: {}", name),
            Error::Record(e) => write!(f, "failed to write record: {}", e),
            Error::ConfigIo(e) => write!(f, "failed to read configuration: {}", e),
            Error::ConfigParse(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::DeviceNotFound(_) => None,
            Error::Record(e) | Error::ConfigIo(e) => Some(e),
            Error::ConfigParse(e) => Some(e),
        }
    }
}
