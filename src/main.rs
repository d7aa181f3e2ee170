use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use prettytable::row;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use rowdb::command::{self, MetaCommand, Statement};
use rowdb::record::{Table, TableError};

/// A minimal single-file record store with an interactive prompt
#[derive(Parser, Debug)]
#[command(name = "rowdb")]
#[command(about = "Single-file record store")]
struct Args {
    /// Path to the database file (created if it does not exist)
    file: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let table = match Table::open(&args.file) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("Unable to open {}: {}", args.file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    match repl(table) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn repl(mut table: Table) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("rowdb > ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        if input.starts_with('.') {
            match command::prepare_meta_command(input) {
                Ok(MetaCommand::Exit) => break,
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            }
        }

        let statement = match command::prepare_statement(input) {
            Ok(statement) => statement,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        match execute_statement(statement, &mut table) {
            Ok(()) => {}
            // Capacity errors are recoverable: report and keep the prompt
            Err(TableError::TableFull { .. }) => println!("Error: Table full."),
            Err(err) => return Err(err.into()),
        }
    }

    table.close()?;
    Ok(())
}

fn execute_statement(statement: Statement, table: &mut Table) -> Result<(), TableError> {
    match statement {
        Statement::Insert(row_to_insert) => {
            table.append(&row_to_insert)?;
            println!("Executed.");
        }
        Statement::Select => {
            let mut output = prettytable::Table::new();
            output.set_titles(row!["id", "username", "email"]);
            for entry in table.scan() {
                let entry = entry?;
                output.add_row(row![entry.id(), entry.username(), entry.email()]);
            }
            output.printstd();
            println!("Executed.");
        }
    }
    Ok(())
}
