//! Benchmark suite for the circulation desk
//!
//! ```bash
//! cargo bench
//! ```
//!
//! - `checkout_return_cycle` - one checkout plus return through the registry lock
//! - `replay_script` - a generated desk script of N loan cycles, end to end

use chrono::NaiveDate;
use library_desk::cli::ReportKind;
use library_desk::session::{process, SessionConfig};
use library_desk::{Book, Library, ManualClock};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

#[divan::bench]
fn checkout_return_cycle(bencher: divan::Bencher) {
    let library = Library::with_clock(Arc::new(ManualClock::new(start())));
    let book = Book::new_as_of("9780306406157", "Dune", "Frank Herbert", 1965, 3, 2024)
        .expect("valid book");
    library.add_book(book).expect("book added");
    let member = library
        .new_member("Bench", "bench@example.com")
        .expect("valid member");
    let due = library.default_due_date().expect("due date in range");

    bencher.bench_local(|| {
        let loan = library
            .checkout(member.id(), "9780306406157", due)
            .expect("checkout failed");
        library.return_loan(loan.id()).expect("return failed")
    });
}

/// Desk script with `cycles` checkout/return pairs spread over 20 members
fn generate_script(cycles: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "command,date,member,isbn,loan,title,author,year,copies,name,email,due,amount"
    )
    .expect("write header");
    for i in 0..10 {
        writeln!(file, "add_book,,,978030640{:04},,Book {},Author,1990,5,,,,", i, i)
            .expect("write");
    }
    for i in 0..20 {
        writeln!(file, "register,,,,,,,,,Member {},m{}@example.com,,", i, i).expect("write");
    }
    for cycle in 0..cycles {
        let member = 1000 + cycle % 20;
        writeln!(file, "checkout,,{},978030640{:04},,,,,,,,,", member, cycle % 10).expect("write");
        writeln!(file, "return,,,,{},,,,,,,,", cycle + 1).expect("write");
    }
    file.flush().expect("flush");
    file
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn replay_script(bencher: divan::Bencher, cycles: usize) {
    let script = generate_script(cycles);
    let config = SessionConfig::new(start(), ReportKind::TopBorrowed, 5, None);

    bencher.bench(|| {
        let mut output = Vec::new();
        process(&config, script.path(), &mut output).expect("Processing failed")
    });
}
