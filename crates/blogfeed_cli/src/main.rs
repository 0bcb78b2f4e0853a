//! CLI smoke entry point and manual diagnostics.
//!
//! # Responsibility
//! - Verify `blogfeed_core` linkage with deterministic output.
//! - Offer `reset <db-path>` to clear a feed database by hand.

use blogfeed_core::db::open_db;
use blogfeed_core::{RecordStore, SqliteStorage};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["ping"] => {
            println!("blogfeed_core ping={}", blogfeed_core::ping());
            println!("blogfeed_core version={}", blogfeed_core::core_version());
            ExitCode::SUCCESS
        }
        ["version"] => {
            println!("{}", blogfeed_core::core_version());
            ExitCode::SUCCESS
        }
        ["reset", path] => match reset(path) {
            Ok(()) => {
                println!("cleared all collections in {path}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("reset failed: {err}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("usage: blogfeed_cli [ping | version | reset <db-path>]");
            ExitCode::from(2)
        }
    }
}

fn reset(path: &str) -> Result<(), String> {
    let conn = open_db(path).map_err(|err| err.to_string())?;
    let storage = SqliteStorage::try_new(&conn).map_err(|err| err.to_string())?;
    RecordStore::new(storage)
        .reset()
        .map_err(|err| err.to_string())
}
