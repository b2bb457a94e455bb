//! CSV format handling for desk scripts and report output
//!
//! This module centralizes all CSV format concerns:
//! - DeskRecord structure for deserialization
//! - Conversion from desk records to [`DeskEntry`] commands
//! - Report serialization for books, members and loans
//!
//! All functions are pure (no file access) for easy testing.

use crate::types::{Book, LibraryError, Loan, Member, MemberId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Date format used by desk scripts and reports
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of a desk script
///
/// Columns: command, date, member, isbn, loan, title, author, year, copies,
/// name, email, due, amount. Every column except `command` is optional and
/// only the ones the command needs are read. Numeric columns stay text here
/// so a bad value is reported by [`convert_desk_record`] with a useful message.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DeskRecord {
    pub command: String,
    pub date: Option<String>,
    pub member: Option<String>,
    pub isbn: Option<String>,
    pub loan: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
    pub copies: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub due: Option<String>,
    pub amount: Option<String>,
}

/// A parsed desk command
#[derive(Debug, Clone, PartialEq)]
pub enum DeskCommand {
    AddBook {
        isbn: String,
        title: String,
        author: String,
        year: i32,
        copies: i32,
    },
    Register {
        name: String,
        email: String,
    },
    Checkout {
        member: MemberId,
        isbn: String,
        due: Option<NaiveDate>,
    },
    Return {
        loan: u32,
    },
    PayFine {
        member: MemberId,
        amount: Decimal,
    },
    Sweep,
}

impl DeskCommand {
    /// Script name of the command, as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            DeskCommand::AddBook { .. } => "add_book",
            DeskCommand::Register { .. } => "register",
            DeskCommand::Checkout { .. } => "checkout",
            DeskCommand::Return { .. } => "return",
            DeskCommand::PayFine { .. } => "pay_fine",
            DeskCommand::Sweep => "sweep",
        }
    }
}

/// A command together with the desk date it should run on
#[derive(Debug, Clone, PartialEq)]
pub struct DeskEntry {
    /// When set, the desk clock moves to this date before the command runs
    pub date: Option<NaiveDate>,
    pub command: DeskCommand,
}

// Blank cells count as missing
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn required(field: Option<String>, column: &str, command: &str) -> Result<String, String> {
    present(field).ok_or_else(|| format!("Missing '{}' for {}", column, command))
}

fn parse_number<T: FromStr>(text: &str, column: &str) -> Result<T, String> {
    text.trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid {} '{}'", column, text))
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", text))
}

/// Convert a DeskRecord to a DeskEntry
///
/// The command name is matched case-insensitively. Columns the command does
/// not use are ignored. Domain validation (ISBN shape, email, quotas) is left
/// to the registry; this only checks that the row is well-formed.
///
/// # Returns
///
/// - Ok(DeskEntry) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_desk_record(record: DeskRecord) -> Result<DeskEntry, String> {
    let date = present(record.date).map(|d| parse_date(&d)).transpose()?;
    let command_name = record.command.trim().to_lowercase();
    let name = command_name.as_str();

    let command = match name {
        "add_book" => DeskCommand::AddBook {
            isbn: required(record.isbn, "isbn", name)?,
            title: required(record.title, "title", name)?,
            author: required(record.author, "author", name)?,
            year: parse_number(&required(record.year, "year", name)?, "year")?,
            copies: parse_number(&required(record.copies, "copies", name)?, "copies")?,
        },
        "register" => DeskCommand::Register {
            name: required(record.name, "name", name)?,
            email: required(record.email, "email", name)?,
        },
        "checkout" => DeskCommand::Checkout {
            member: parse_number(&required(record.member, "member", name)?, "member")?,
            isbn: required(record.isbn, "isbn", name)?,
            due: present(record.due).map(|d| parse_date(&d)).transpose()?,
        },
        "return" => DeskCommand::Return {
            loan: parse_number(&required(record.loan, "loan", name)?, "loan")?,
        },
        "pay_fine" => DeskCommand::PayFine {
            member: parse_number(&required(record.member, "member", name)?, "member")?,
            amount: parse_number::<Decimal>(&required(record.amount, "amount", name)?, "amount")?,
        },
        "sweep" => DeskCommand::Sweep,
        _ => return Err(format!("Invalid command: '{}'", record.command)),
    };

    Ok(DeskEntry { date, command })
}

const BOOK_COLUMNS: [&str; 7] = [
    "isbn",
    "title",
    "author",
    "year",
    "total",
    "available",
    "times_borrowed",
];

fn book_row(book: &Book) -> [String; 7] {
    [
        book.isbn().to_string(),
        book.title().to_string(),
        book.author().to_string(),
        book.year().to_string(),
        book.total_copies().to_string(),
        book.available_copies().to_string(),
        book.times_borrowed().to_string(),
    ]
}

/// Write books as CSV: isbn, title, author, year, total, available, times_borrowed
pub fn write_books_csv(books: &[Book], output: &mut dyn Write) -> Result<(), LibraryError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(BOOK_COLUMNS)?;
    for book in books {
        writer.write_record(book_row(book))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a ranking of books, prefixed with a 1-based rank column
pub fn write_top_books_csv(books: &[Book], output: &mut dyn Write) -> Result<(), LibraryError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(std::iter::once("rank").chain(BOOK_COLUMNS))?;
    for (index, book) in books.iter().enumerate() {
        let rank = (index + 1).to_string();
        writer.write_record(std::iter::once(rank).chain(book_row(book)))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write members as CSV: id, name, email, active_loans, fines
pub fn write_members_csv(members: &[Member], output: &mut dyn Write) -> Result<(), LibraryError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "name", "email", "active_loans", "fines"])?;
    for member in members {
        writer.write_record(&[
            member.id().to_string(),
            member.name().to_string(),
            member.email().to_string(),
            member.active_loan_count().to_string(),
            format!("{:.2}", member.fines()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write loans as CSV: id, member, isbn, loan_date, due_date, return_date, state
///
/// An open loan has an empty return_date.
pub fn write_loans_csv(loans: &[Loan], output: &mut dyn Write) -> Result<(), LibraryError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record([
        "id",
        "member",
        "isbn",
        "loan_date",
        "due_date",
        "return_date",
        "state",
    ])?;
    for loan in loans {
        writer.write_record(&[
            loan.id().to_string(),
            loan.member().to_string(),
            loan.isbn().to_string(),
            loan.loan_date().format(DATE_FORMAT).to_string(),
            loan.due_date().format(DATE_FORMAT).to_string(),
            loan.return_date()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            loan.state().as_str().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Isbn;
    use rstest::rstest;

    const ISBN: &str = "9780306406157";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(command: &str) -> DeskRecord {
        DeskRecord {
            command: command.to_string(),
            ..DeskRecord::default()
        }
    }

    #[test]
    fn test_convert_add_book() {
        let rec = DeskRecord {
            isbn: Some(ISBN.to_string()),
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            year: Some("1965".to_string()),
            copies: Some(" 2 ".to_string()),
            ..record("add_book")
        };

        let entry = convert_desk_record(rec).unwrap();
        assert_eq!(entry.date, None);
        assert_eq!(
            entry.command,
            DeskCommand::AddBook {
                isbn: ISBN.to_string(),
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                year: 1965,
                copies: 2,
            }
        );
    }

    #[rstest]
    #[case::upper_case("CHECKOUT")]
    #[case::mixed_case("CheckOut")]
    #[case::padded(" checkout ")]
    fn test_command_is_case_insensitive(#[case] command: &str) {
        let rec = DeskRecord {
            member: Some("1000".to_string()),
            isbn: Some(ISBN.to_string()),
            ..record(command)
        };

        let entry = convert_desk_record(rec).unwrap();
        assert_eq!(
            entry.command,
            DeskCommand::Checkout {
                member: 1000,
                isbn: ISBN.to_string(),
                due: None
            }
        );
    }

    #[test]
    fn test_convert_checkout_with_dates() {
        let rec = DeskRecord {
            date: Some("2024-03-01".to_string()),
            member: Some("1000".to_string()),
            isbn: Some(ISBN.to_string()),
            due: Some("2024-03-08".to_string()),
            ..record("checkout")
        };

        let entry = convert_desk_record(rec).unwrap();
        assert_eq!(entry.date, Some(date(2024, 3, 1)));
        assert_eq!(
            entry.command,
            DeskCommand::Checkout {
                member: 1000,
                isbn: ISBN.to_string(),
                due: Some(date(2024, 3, 8)),
            }
        );
    }

    #[rstest]
    #[case::integer("100", Decimal::new(100, 0))]
    #[case::two_places("12.50", Decimal::new(1250, 2))]
    #[case::padded(" 7.5 ", Decimal::new(75, 1))]
    fn test_convert_pay_fine_amount(#[case] amount: &str, #[case] expected: Decimal) {
        let rec = DeskRecord {
            member: Some("1001".to_string()),
            amount: Some(amount.to_string()),
            ..record("pay_fine")
        };

        let entry = convert_desk_record(rec).unwrap();
        assert_eq!(
            entry.command,
            DeskCommand::PayFine {
                member: 1001,
                amount: expected
            }
        );
    }

    #[test]
    fn test_convert_sweep_and_return() {
        assert_eq!(
            convert_desk_record(record("sweep")).unwrap().command,
            DeskCommand::Sweep
        );

        let rec = DeskRecord {
            loan: Some("4".to_string()),
            ..record("return")
        };
        assert_eq!(
            convert_desk_record(rec).unwrap().command,
            DeskCommand::Return { loan: 4 }
        );
    }

    #[rstest]
    #[case::unknown_command(record("renew"), "Invalid command: 'renew'")]
    #[case::missing_email(
        DeskRecord { name: Some("Ada".to_string()), ..record("register") },
        "Missing 'email' for register"
    )]
    #[case::blank_loan(
        DeskRecord { loan: Some("  ".to_string()), ..record("return") },
        "Missing 'loan' for return"
    )]
    #[case::bad_member(
        DeskRecord {
            member: Some("abc".to_string()),
            isbn: Some(ISBN.to_string()),
            ..record("checkout")
        },
        "Invalid member 'abc'"
    )]
    #[case::bad_amount(
        DeskRecord {
            member: Some("1000".to_string()),
            amount: Some("ten".to_string()),
            ..record("pay_fine")
        },
        "Invalid amount 'ten'"
    )]
    #[case::bad_date(
        DeskRecord { date: Some("03/01/2024".to_string()), ..record("sweep") },
        "Invalid date '03/01/2024'"
    )]
    #[case::bad_due(
        DeskRecord {
            member: Some("1000".to_string()),
            isbn: Some(ISBN.to_string()),
            due: Some("2024-02-30".to_string()),
            ..record("checkout")
        },
        "Invalid date '2024-02-30'"
    )]
    fn test_convert_desk_record_errors(#[case] rec: DeskRecord, #[case] expected: &str) {
        let err = convert_desk_record(rec).unwrap_err();
        assert!(
            err.contains(expected),
            "Expected error containing '{}', got '{}'",
            expected,
            err
        );
    }

    fn sample_book(times: u32) -> Book {
        let mut book = Book::new_as_of(ISBN, "Dune", "Frank Herbert", 1965, 2, 2024).unwrap();
        for _ in 0..times {
            book.checkout_one_copy().unwrap();
        }
        book
    }

    #[test]
    fn test_write_books_csv() {
        let mut output = Vec::new();
        write_books_csv(&[sample_book(1)], &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "isbn,title,author,year,total,available,times_borrowed\n\
             9780306406157,Dune,Frank Herbert,1965,2,1,1\n"
        );
    }

    #[test]
    fn test_write_top_books_csv_ranks_from_one() {
        let mut output = Vec::new();
        write_top_books_csv(&[sample_book(2)], &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "rank,isbn,title,author,year,total,available,times_borrowed\n\
             1,9780306406157,Dune,Frank Herbert,1965,2,0,2\n"
        );
    }

    #[rstest]
    #[case::empty(vec![], "id,name,email,active_loans,fines\n")]
    #[case::with_fine(
        vec![{
            let mut m = Member::new(1000, "Ada", "ada@example.com").unwrap();
            m.add_fine(Decimal::new(2500, 0));
            m
        }],
        "id,name,email,active_loans,fines\n1000,Ada,ada@example.com,0,2500.00\n"
    )]
    fn test_write_members_csv(#[case] members: Vec<Member>, #[case] expected: &str) {
        let mut output = Vec::new();
        write_members_csv(&members, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_loans_csv_open_and_closed() {
        let isbn = Isbn::parse(ISBN).unwrap();
        let open = Loan::new(1, 1000, isbn.clone(), date(2024, 3, 1), date(2024, 3, 15));
        let mut closed = Loan::new(2, 1000, isbn, date(2024, 3, 1), date(2024, 3, 5));
        closed.close(date(2024, 3, 6));

        let mut output = Vec::new();
        write_loans_csv(&[open, closed], &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,member,isbn,loan_date,due_date,return_date,state\n\
             1,1000,9780306406157,2024-03-01,2024-03-15,,active\n\
             2,1000,9780306406157,2024-03-01,2024-03-05,2024-03-06,overdue\n"
        );
    }
}
