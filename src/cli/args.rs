use crate::session::{SessionConfig, DEFAULT_TOP};
use crate::types::MemberId;
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay a library desk script and print a report
#[derive(Parser, Debug)]
#[command(name = "library-desk")]
#[command(about = "Replay a library circulation desk script and print a report", long_about = None)]
pub struct CliArgs {
    /// Desk-script CSV file
    #[arg(value_name = "INPUT", help = "Path to the desk-script CSV file")]
    pub input_file: PathBuf,

    /// Report to print once the script has run
    #[arg(
        long = "report",
        value_name = "KIND",
        default_value = "catalog",
        help = "Report to print after the script has run"
    )]
    pub report: ReportKind,

    /// Number of books in the top-borrowed report
    #[arg(
        long = "top",
        value_name = "N",
        help = "Number of books in the top-borrowed report (default: 5)"
    )]
    pub top: Option<usize>,

    /// Only list loans of this member
    #[arg(
        long = "member",
        value_name = "ID",
        help = "Restrict the loans report to one member"
    )]
    pub member: Option<MemberId>,

    /// Desk date before the first dated row
    #[arg(
        long = "today",
        value_name = "DATE",
        value_parser = parse_iso_date,
        help = "Starting desk date as YYYY-MM-DD (default: local today)"
    )]
    pub today: Option<NaiveDate>,

    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Minimum level of log lines written to stderr"
    )]
    pub log_level: LogLevel,

    #[arg(long = "log-json", help = "Write log lines to stderr as JSON")]
    pub log_json: bool,
}

/// Reports the desk can print
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Every book, by ISBN
    Catalog,
    /// Books with at least one copy on the shelf
    Available,
    /// Most borrowed books, ranked
    TopBorrowed,
    /// Every member, by id
    Members,
    /// Members who owe fines, largest balance first
    Fines,
    /// Loans by id, or one member's loans newest first
    Loans,
}

/// Log verbosity
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    crate::io::parse_date(value)
}

impl CliArgs {
    /// Create a SessionConfig from CLI arguments
    ///
    /// Options that were not given fall back to their defaults: today's
    /// local date and a top-borrowed limit of 5. A `--top` of zero also
    /// falls back to 5.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::new(
            self.today.unwrap_or_else(|| Local::now().date_naive()),
            self.report,
            self.top.unwrap_or(DEFAULT_TOP),
            self.member,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_report(&["program", "desk.csv"], ReportKind::Catalog)]
    #[case::available(&["program", "--report", "available", "desk.csv"], ReportKind::Available)]
    #[case::top_borrowed(
        &["program", "--report", "top-borrowed", "desk.csv"],
        ReportKind::TopBorrowed
    )]
    #[case::members(&["program", "--report", "members", "desk.csv"], ReportKind::Members)]
    #[case::fines(&["program", "--report", "fines", "desk.csv"], ReportKind::Fines)]
    #[case::loans(&["program", "--report", "loans", "desk.csv"], ReportKind::Loans)]
    fn test_report_parsing(#[case] args: &[&str], #[case] expected: ReportKind) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.report, expected);
    }

    #[rstest]
    #[case::no_options(&["program", "desk.csv"], 5, None)]
    #[case::custom_top(&["program", "--top", "3", "desk.csv"], 3, None)]
    #[case::zero_top(&["program", "--top", "0", "desk.csv"], 5, None)]
    #[case::member(&["program", "--member", "1001", "desk.csv"], 5, Some(1001))]
    fn test_session_config_conversion(
        #[case] args: &[&str],
        #[case] expected_top: usize,
        #[case] expected_member: Option<MemberId>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_session_config();

        assert_eq!(config.top, expected_top);
        assert_eq!(config.member, expected_member);
    }

    #[test]
    fn test_today_option() {
        let args = ["program", "--today", "2024-03-01", "desk.csv"];
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_session_config();
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[rstest]
    #[case::default(&["program", "desk.csv"], LogLevel::Warn, false)]
    #[case::debug_json(
        &["program", "--log-level", "debug", "--log-json", "desk.csv"],
        LogLevel::Debug,
        true
    )]
    fn test_logging_options(
        #[case] args: &[&str],
        #[case] level: LogLevel,
        #[case] json: bool,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.log_level, level);
        assert_eq!(parsed.log_json, json);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_report(&["program", "--report", "overdue", "desk.csv"])]
    #[case::invalid_date(&["program", "--today", "01/03/2024", "desk.csv"])]
    #[case::negative_member(&["program", "--member", "-1", "desk.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
