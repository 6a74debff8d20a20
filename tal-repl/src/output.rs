use serde::Serialize;
use tal::debug;
use tal::heap::HeapStats;
use tal::lex::{Token, Tokenizer};
use tal::{Interpreter, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => format!("{{\"Err\":\"cannot serialize: {}\"}}", err),
    }
}

pub fn render(interp: &Interpreter, value: Value, format: Format) -> String {
    match format {
        Format::Text => format!("=> {}", interp.display(value)),
        Format::Json => to_json(&interp.heap().to_datum(value)),
    }
}

/// Token dump of one line, newline terminated.
pub fn render_tokens(src: &str, format: Format) -> String {
    match format {
        Format::Text => debug::tokens(src),
        Format::Json => {
            let tokens: Vec<Token<'_>> = Tokenizer::new(src).collect();
            to_json(&tokens) + "\n"
        },
    }
}

pub fn render_stats(stats: &HeapStats, format: Format) -> String {
    match format {
        Format::Text => format!(
            "symbols  {}\ncells    {}\nlambdas  {}\nerrors   {}",
            stats.symbols, stats.cells, stats.lambdas, stats.errors
        ),
        Format::Json => to_json(stats),
    }
}

/// Evaluates every form in `src`, printing results to stdout and the first
/// failure to stderr. Returns `false` if anything failed.
pub fn eval_and_print(interp: &mut Interpreter, src: &str, format: Format) -> bool {
    let results = match interp.eval_forms(src) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("error: {}", err);
            return false;
        },
    };

    let mut ok = true;
    for result in results {
        match result {
            Ok(value) => println!("{}", render(interp, value, format)),
            Err(err) => {
                eprintln!("error: {}", err);
                ok = false;
            },
        }
    }
    ok
}
