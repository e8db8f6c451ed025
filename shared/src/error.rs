use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub String);

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error(format!("IO error: {error}"))
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error(format!("Config error: {error}"))
    }
}

impl From<tinytga::ParseError> for Error {
    fn from(error: tinytga::ParseError) -> Self {
        Error(format!("Image error: {error:?}"))
    }
}

impl From<time::error::ComponentRange> for Error {
    fn from(error: time::error::ComponentRange) -> Self {
        Error(format!("Time error: {error}"))
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error(String::from(error))
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error(error)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Error {}
