//! End-to-end integration tests
//!
//! These tests replay desk scripts from predefined CSV fixtures. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Replays every row against a fresh library dated 2024-03-01
//! 3. Writes one report
//! 4. Compares it with expected_<report>.csv from the same directory
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - A same-day checkout and return
//! - Late returns, repeated returns, sweeps and fine payments
//! - Loan quotas, exhausted copies and unknown ids
//! - Merge-on-insert and rejected catalog entries
//! - Malformed rows mixed with valid ones

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use library_desk::cli::ReportKind;
    use library_desk::session::{process, SessionConfig};
    use library_desk::{ErrorKind, LibraryError};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn report_file_name(report: ReportKind) -> &'static str {
        match report {
            ReportKind::Catalog => "expected_catalog.csv",
            ReportKind::Available => "expected_available.csv",
            ReportKind::TopBorrowed => "expected_top_borrowed.csv",
            ReportKind::Members => "expected_members.csv",
            ReportKind::Fines => "expected_fines.csv",
            ReportKind::Loans => "expected_loans.csv",
        }
    }

    /// Replay tests/fixtures/{fixture_name}/input.csv and compare the report
    ///
    /// # Panics
    ///
    /// Panics if a fixture file is missing or the report does not match.
    fn run_test_fixture(fixture_name: &str, report: ReportKind) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/{}", fixture_dir, report_file_name(report));

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let config = SessionConfig::new(start_date(), report, 5, None);
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        process(&config, Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to replay desk script: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (report: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, report, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("happy_path", ReportKind::Catalog)]
    #[case("happy_path", ReportKind::Loans)]
    #[case("happy_path", ReportKind::Members)]
    #[case("late_return_fines", ReportKind::Fines)]
    #[case("late_return_fines", ReportKind::Loans)]
    #[case("late_return_fines", ReportKind::Catalog)]
    #[case("quota_and_unavailable", ReportKind::Catalog)]
    #[case("quota_and_unavailable", ReportKind::Members)]
    #[case("quota_and_unavailable", ReportKind::Available)]
    #[case("merge_on_insert", ReportKind::Catalog)]
    #[case("malformed_rows", ReportKind::TopBorrowed)]
    #[case("malformed_rows", ReportKind::Members)]
    fn test_fixtures(#[case] fixture: &str, #[case] report: ReportKind) {
        run_test_fixture(fixture, report);
    }

    #[test]
    fn test_malformed_rows_summary() {
        let config = SessionConfig::new(start_date(), ReportKind::Catalog, 5, None);
        let mut output = Vec::new();

        let summary = process(
            &config,
            Path::new("tests/fixtures/malformed_rows/input.csv"),
            &mut output,
        )
        .unwrap();

        assert_eq!(summary.applied, 10);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.malformed, 5);
    }

    #[test]
    fn test_missing_input_file() {
        let config = SessionConfig::new(start_date(), ReportKind::Catalog, 5, None);
        let mut output = Vec::new();

        let err = process(
            &config,
            Path::new("tests/fixtures/does_not_exist/input.csv"),
            &mut output,
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(matches!(err, LibraryError::FileNotFound { .. }));
    }
}
