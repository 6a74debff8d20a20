mod command;

use std::env;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use tal::debug::describe;
use tal::Interpreter;
use tracing::warn;

use crate::output::{self, Format};
use command::{parse_command, print_help, ParsedCommand};

const PROMPT: &str = ">> ";

/// History lives next to the user's other dotfiles. Missing `HOME` just
/// means no persistent history.
fn repl_history_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".tal_history"))
}

fn print_env(interp: &Interpreter) {
    let heap = interp.heap();
    for (sym, value) in interp.env().bindings() {
        println!("{:<16} {}", heap.name(sym), heap.display(value));
    }
    println!(
        "{} of {} bindings used",
        interp.env().len(),
        interp.env().capacity()
    );
}

pub fn interactive_loop(interp: &mut Interpreter, format: Format) {
    let mut rl = rustyline::Editor::<()>::new();

    let history_path = repl_history_path();
    if let Some(ref history_path) = history_path {
        let _ = rl.load_history(history_path);
    }

    println!("tal version {}", env!("CARGO_PKG_VERSION"));
    print_help();

    let mut dump_tokens = false;
    let mut dump_values = false;

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                warn!(%err, "readline failed");
                eprintln!("error: {}", err);
                break;
            },
        };

        if !line.chars().all(char::is_whitespace) {
            rl.add_history_entry(line.as_str());
        }

        match parse_command(line) {
            ParsedCommand::Help => print_help(),
            ParsedCommand::Quit => break,
            ParsedCommand::ToggleTokens => {
                dump_tokens = !dump_tokens;
                println!("token dump {}", if dump_tokens { "on" } else { "off" });
            },
            ParsedCommand::ToggleValues => {
                dump_values = !dump_values;
                println!("value dump {}", if dump_values { "on" } else { "off" });
            },
            ParsedCommand::ListEnv => print_env(interp),
            ParsedCommand::Stats => {
                println!("{}", output::render_stats(&interp.heap().stats(), format));
            },
            ParsedCommand::Unknown(command) => {
                eprintln!("unknown command `{}`, try \\h", command);
            },
            ParsedCommand::Eval(src) => {
                if dump_tokens {
                    print!("{}", output::render_tokens(&src, format));
                }
                eval_line(interp, &src, format, dump_values);
            },
        }
    }

    if let Some(ref history_path) = history_path {
        if let Err(err) = rl.save_history(history_path) {
            warn!(%err, "cannot save history");
        }
    }
}

fn eval_line(interp: &mut Interpreter, src: &str, format: Format, dump_values: bool) {
    let results = match interp.eval_forms(src) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("error: {}", err);
            return;
        },
    };

    for result in results {
        match result {
            Ok(value) => {
                println!("{}", output::render(interp, value, format));
                if dump_values {
                    print!("{}", describe(interp.heap(), value));
                }
            },
            Err(err) => eprintln!("error: {}", err),
        }
    }
}
