use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    DirectoryDoesNotExist(String),
    EmptyValue(String),
    NotInRange(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::DirectoryDoesNotExist(e) => write!(f, "Directory error: {}", e),
            ConfigError::EmptyValue(e) => write!(f, "Empty configuration value: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug)]
pub enum IngestError {
    DirectoryUnreadable(PathBuf, std::io::Error),
    FileUnreadable(PathBuf, std::io::Error),
    PatternError(regex::Error),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::DirectoryUnreadable(p, e) => {
                write!(f, "Log directory {} unreadable: {}", p.display(), e)
            }
            IngestError::FileUnreadable(p, e) => {
                write!(f, "Log file {} unreadable: {}", p.display(), e)
            }
            IngestError::PatternError(e) => write!(f, "Line pattern failed to compile: {}", e),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<regex::Error> for IngestError {
    fn from(err: regex::Error) -> Self {
        IngestError::PatternError(err)
    }
}

#[derive(Debug)]
pub enum AccountingError {
    Unavailable(PathBuf, std::io::Error),
    MalformedRecords(String),
}

impl fmt::Display for AccountingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountingError::Unavailable(p, e) => {
                write!(f, "Accounting store {} unavailable: {}", p.display(), e)
            }
            AccountingError::MalformedRecords(e) => {
                write!(f, "Accounting records malformed: {}", e)
            }
        }
    }
}

impl std::error::Error for AccountingError {}

#[derive(Debug)]
pub enum ControllerError {
    ConfigurationError(ConfigError),
    IngestError(IngestError),
    AccountingError(AccountingError),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            ControllerError::IngestError(e) => write!(f, "Ingest error: {}", e),
            ControllerError::AccountingError(e) => write!(f, "Accounting error: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::ConfigurationError(err)
    }
}

impl From<IngestError> for ControllerError {
    fn from(err: IngestError) -> Self {
        ControllerError::IngestError(err)
    }
}

impl From<AccountingError> for ControllerError {
    fn from(err: AccountingError) -> Self {
        ControllerError::AccountingError(err)
    }
}
