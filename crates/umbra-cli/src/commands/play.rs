use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::SessionArgs;

pub fn run(args: &SessionArgs, save: Option<&Path>) -> Result<(), String> {
    let mut engine = super::start_engine(args)?;

    let summary = engine.constraints();
    println!("  {} {}", "Umbra".bold(), format!("(turn {})", summary.turn).dimmed());
    println!("  You are in: {}", summary.current_room.name);
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            break;
        }

        let result = engine.execute(input);
        if result.success {
            if !result.message.is_empty() {
                println!("{}\n", result.message);
            }
        } else {
            println!("{}\n", result.message.yellow());
        }
    }

    if let Some(path) = save {
        super::write_save(&engine, path)?;
        println!("  Saved to {}", path.display());
    }
    Ok(())
}
