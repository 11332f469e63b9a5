use super::types::*;
use crate::error_handling::types::ConfigError;
use crate::log_parsing::TimeBasis;
use clap::Parser;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration for one audit run.
///
/// Read from a TOML file whose sections mirror the fields below; every key is
/// optional and falls back to the production defaults. Selected values can be
/// overridden from the command line through [`Cli`].
///
/// # Examples
///
/// ```
/// use overflow_audit::configuration::Config;
///
/// let config = Config::from_toml_str(
///     r#"
///     [corpus]
///     log_directory = "/var/log/xrootd"
///     time_basis = "utc"
///
///     [matching]
///     tolerance_secs = 900
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.matching.tolerance_secs, 900);
/// assert_eq!(config.accounting.exit_code, 84);
/// ```
///
/// # Fields Overview
///
/// - `corpus`: log directory, file-name marker and the zone log timestamps are written in
/// - `accounting`: records file, exit code / resource type / overflow filter, report window
/// - `matching`: window tolerance, open-session grace and the host lookup chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub accounting: AccountingConfig,
    pub matching: MatchingConfig,
}

/// Command-line arguments.
///
/// Every option overrides the corresponding configuration-file value.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "overflow-audit")]
#[command(version)]
#[command(about = "Correlates failed overflow jobs with xrootd redirector sessions")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c', env = "OVERFLOW_AUDIT_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Directory holding the xrootd logs
    #[arg(long, env = "OVERFLOW_AUDIT_LOG_DIR")]
    pub log_directory: Option<PathBuf>,

    /// JSON file with exported accounting rows
    #[arg(long)]
    pub accounting_records: Option<PathBuf>,

    /// Zone of log timestamps: `local`, `utc` or `±HH:MM`
    #[arg(long)]
    pub time_basis: Option<TimeBasis>,

    /// Exit code of the jobs to audit
    #[arg(long)]
    pub exit_code: Option<i32>,

    /// Seconds a login/disconnect may trail the job start/end
    #[arg(long)]
    pub tolerance_secs: Option<i64>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Configuration read from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Reads the file named by `cli` (defaults otherwise), applies the
    /// command-line overrides and validates the result.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config_file {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No configuration file given, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.log_directory {
            self.corpus.log_directory = dir.clone();
        }
        if let Some(path) = &cli.accounting_records {
            self.accounting.records_path = path.clone();
        }
        if let Some(basis) = cli.time_basis {
            self.corpus.time_basis = basis;
        }
        if let Some(code) = cli.exit_code {
            self.accounting.exit_code = code;
        }
        if let Some(secs) = cli.tolerance_secs {
            self.matching.tolerance_secs = secs;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.corpus.log_directory.is_dir() {
            return Err(ConfigError::DirectoryDoesNotExist(format!(
                "log directory {} does not exist",
                self.corpus.log_directory.display()
            )));
        }
        if self.corpus.file_marker.is_empty() {
            return Err(ConfigError::EmptyValue(String::from("corpus.file_marker")));
        }
        if self.accounting.resource_type.is_empty() {
            return Err(ConfigError::EmptyValue(String::from("accounting.resource_type")));
        }
        if self.accounting.cutoff_hour > 23 {
            return Err(ConfigError::NotInRange(format!(
                "accounting.cutoff_hour must be 0-23, got {}",
                self.accounting.cutoff_hour
            )));
        }
        match (self.accounting.earliest_end, self.accounting.latest_end) {
            (Some(earliest), Some(latest)) if earliest >= latest => {
                return Err(ConfigError::NotInRange(format!(
                    "accounting.earliest_end {} is not before latest_end {}",
                    earliest.to_rfc3339(),
                    latest.to_rfc3339()
                )));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError::EmptyValue(String::from(
                    "accounting.earliest_end and accounting.latest_end must be set together",
                )));
            }
            _ => {}
        }
        if self.matching.tolerance_secs <= 0 {
            return Err(ConfigError::NotInRange(format!(
                "matching.tolerance_secs must be positive, got {}",
                self.matching.tolerance_secs
            )));
        }
        if self.matching.open_session_grace_secs < 0 {
            return Err(ConfigError::NotInRange(format!(
                "matching.open_session_grace_secs must not be negative, got {}",
                self.matching.open_session_grace_secs
            )));
        }
        if self.matching.host_lookup.is_empty() {
            return Err(ConfigError::EmptyValue(String::from("matching.host_lookup")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::HostLookupStrategy;
    use chrono::{FixedOffset, TimeZone, Utc};
    use serial_test::serial;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.corpus.log_directory = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.corpus.log_directory, PathBuf::from("/var/log/xrootd"));
        assert_eq!(config.corpus.file_marker, "xrootd.log");
        assert_eq!(config.corpus.time_basis, TimeBasis::Local);
        assert_eq!(config.accounting.exit_code, 84);
        assert_eq!(config.accounting.resource_type, "BatchPilot");
        assert!(config.accounting.overflow_only);
        assert_eq!(config.accounting.cutoff_hour, 14);
        assert_eq!(config.matching.tolerance_secs, 600);
        assert_eq!(config.matching.open_session_grace_secs, 100);
        assert_eq!(
            config.matching.host_lookup,
            vec![
                HostLookupStrategy::Exact,
                HostLookupStrategy::WithoutPort,
                HostLookupStrategy::ShortName
            ]
        );
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str(
            r#"
            [corpus]
            log_directory = "/data/xrootd"
            time_basis = "-05:00"

            [accounting]
            records_path = "/data/gratia.json"
            exit_code = 85
            earliest_end = "2012-04-05T14:00:00Z"
            latest_end = "2012-04-06T14:00:00Z"

            [matching]
            host_lookup = ["exact", "short_name"]
            "#,
        )
        .unwrap();
        assert_eq!(config.corpus.log_directory, PathBuf::from("/data/xrootd"));
        assert_eq!(config.corpus.file_marker, "xrootd.log");
        assert_eq!(
            config.corpus.time_basis,
            TimeBasis::Fixed(FixedOffset::west_opt(5 * 3600).unwrap())
        );
        assert_eq!(config.accounting.exit_code, 85);
        assert_eq!(
            config.accounting.earliest_end,
            Some(Utc.with_ymd_and_hms(2012, 4, 5, 14, 0, 0).unwrap())
        );
        assert_eq!(config.matching.host_lookup.len(), 2);
        assert_eq!(config.matching.tolerance_secs, 600);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Config::from_toml_str("[corpus]\ntime_basis = \"mars\"\n"),
            Err(ConfigError::TomlError(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[matching]\nhost_lookup = [\"fuzzy\"]\n"),
            Err(ConfigError::TomlError(_))
        ));
    }

    #[test]
    fn test_validate() {
        let dir = TempDir::new().unwrap();
        assert!(config_in(&dir).validate().is_ok());

        let mut missing_dir = config_in(&dir);
        missing_dir.corpus.log_directory = dir.path().join("absent");
        assert!(matches!(missing_dir.validate(), Err(ConfigError::DirectoryDoesNotExist(_))));

        let mut zero_window = config_in(&dir);
        zero_window.matching.tolerance_secs = 0;
        assert!(matches!(zero_window.validate(), Err(ConfigError::NotInRange(_))));

        let mut no_lookup = config_in(&dir);
        no_lookup.matching.host_lookup.clear();
        assert!(matches!(no_lookup.validate(), Err(ConfigError::EmptyValue(_))));

        let mut bad_hour = config_in(&dir);
        bad_hour.accounting.cutoff_hour = 24;
        assert!(matches!(bad_hour.validate(), Err(ConfigError::NotInRange(_))));

        let mut inverted = config_in(&dir);
        inverted.accounting.earliest_end = Some(Utc.with_ymd_and_hms(2012, 4, 6, 0, 0, 0).unwrap());
        inverted.accounting.latest_end = Some(Utc.with_ymd_and_hms(2012, 4, 5, 0, 0, 0).unwrap());
        assert!(matches!(inverted.validate(), Err(ConfigError::NotInRange(_))));

        let mut half_open = config_in(&dir);
        half_open.accounting.latest_end = None;
        half_open.accounting.earliest_end = Some(Utc.with_ymd_and_hms(2012, 4, 6, 0, 0, 0).unwrap());
        assert!(matches!(half_open.validate(), Err(ConfigError::EmptyValue(_))));
    }

    #[test]
    #[serial]
    fn test_load_with_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("audit.toml");
        fs::write(
            &config_path,
            format!(
                "[corpus]\nlog_directory = {:?}\n[accounting]\nexit_code = 1\n",
                dir.path().display().to_string()
            ),
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "overflow-audit",
            "--config-file",
            config_path.to_str().unwrap(),
            "--exit-code",
            "84",
            "--time-basis",
            "utc",
            "--tolerance-secs",
            "300",
            "--accounting-records",
            "/tmp/records.json",
        ])
        .unwrap();
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.corpus.log_directory, dir.path());
        assert_eq!(config.accounting.exit_code, 84);
        assert_eq!(config.corpus.time_basis, TimeBasis::Utc);
        assert_eq!(config.matching.tolerance_secs, 300);
        assert_eq!(config.accounting.records_path, PathBuf::from("/tmp/records.json"));
    }

    #[test]
    #[serial]
    fn test_log_directory_from_env() {
        let dir = TempDir::new().unwrap();
        std::env::set_var("OVERFLOW_AUDIT_LOG_DIR", dir.path());
        let parsed = Cli::try_parse_from(["overflow-audit"]);
        std::env::remove_var("OVERFLOW_AUDIT_LOG_DIR");

        let cli = parsed.unwrap();
        assert_eq!(cli.log_directory.as_deref(), Some(dir.path()));
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.corpus.log_directory, dir.path());
    }

    #[test]
    fn test_largest_tolerance_is_usable() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.matching.tolerance_secs = i64::MAX;
        config.matching.open_session_grace_secs = i64::MAX;
        assert!(config.validate().is_ok());

        let open = crate::session_index::SessionRecord {
            login_time: Some(1_000),
            ..Default::default()
        };
        assert!(config.matching.window().accepts(&open, 1_000, 2_000, 2_000));
    }

    #[test]
    fn test_rejects_bad_time_basis_argument() {
        assert!(Cli::try_parse_from(["overflow-audit", "--time-basis", "mars"]).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            config_file: Some(dir.path().join("absent.toml")),
            ..Default::default()
        };
        assert!(matches!(Config::load(&cli), Err(ConfigError::IoError(_))));
    }
}
