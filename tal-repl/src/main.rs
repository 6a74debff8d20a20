#![warn(rust_2018_idioms)]

mod output;
mod repl;

use std::{fs, process};

use clap::{crate_version, value_t, App, Arg};
use tal::{Config, Interpreter};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TAL_LOG";

fn init_logging(verbosity: u64) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &clap::ArgMatches<'_>) -> Config {
    let mut config = match matches.value_of("CONFIG") {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|err| {
                eprintln!("cannot read config `{}`: {}", path, err);
                process::exit(1);
            });
            serde_json::from_str(&text).unwrap_or_else(|err| {
                eprintln!("invalid config `{}`: {}", path, err);
                process::exit(1);
            })
        },
        None => Config::default(),
    };

    if matches.is_present("MAX_SYMBOLS") {
        config.max_symbols =
            value_t!(matches, "MAX_SYMBOLS", usize).unwrap_or_else(|e| e.exit());
    }
    if matches.is_present("ENV_CAPACITY") {
        config.env_capacity =
            value_t!(matches, "ENV_CAPACITY", usize).unwrap_or_else(|e| e.exit());
    }
    if matches.is_present("NO_LIST_BUILTINS") {
        config.list_builtins = false;
    }

    config
}

fn cli() -> App<'static, 'static> {
    App::new("tal")
        .version(crate_version!())
        .about("Interpreter and REPL for tal, a minimal symbolic-expression language")
        .arg(Arg::with_name("FILE").help("Source file to evaluate").index(1))
        .arg(
            Arg::with_name("INTERACTIVE")
                .short("i")
                .long("interactive")
                .help("Start the REPL after evaluating FILE"),
        )
        .arg(
            Arg::with_name("JSON")
                .long("json")
                .help("Print results as JSON"),
        )
        .arg(
            Arg::with_name("CONFIG")
                .long("config")
                .value_name("FILE")
                .help("Read interpreter limits from a JSON file"),
        )
        .arg(
            Arg::with_name("MAX_SYMBOLS")
                .long("max-symbols")
                .value_name("N")
                .help("Maximum number of distinct symbols"),
        )
        .arg(
            Arg::with_name("ENV_CAPACITY")
                .long("env-capacity")
                .value_name("N")
                .help("Maximum number of bindings"),
        )
        .arg(
            Arg::with_name("NO_LIST_BUILTINS")
                .long("no-list-builtins")
                .help("Do not bind `head` and `tail`"),
        )
        .arg(
            Arg::with_name("VERBOSE")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Raise the log level (repeat for more)"),
        )
}

fn main() {
    let matches = cli().get_matches();

    init_logging(matches.occurrences_of("VERBOSE"));

    let config = load_config(&matches);
    debug!(?config, "loaded config");

    let mut interp = Interpreter::with_config(&config).unwrap_or_else(|err| {
        error!(%err, "cannot start interpreter");
        eprintln!("error: {}", err);
        process::exit(1);
    });

    let format = if matches.is_present("JSON") {
        output::Format::Json
    } else {
        output::Format::Text
    };

    match matches.value_of("FILE") {
        Some(path) => {
            let src = fs::read_to_string(path).unwrap_or_else(|err| {
                eprintln!("cannot read `{}`: {}", path, err);
                process::exit(1);
            });

            let ok = output::eval_and_print(&mut interp, &src, format);
            if matches.is_present("INTERACTIVE") {
                repl::interactive_loop(&mut interp, format);
            } else if !ok {
                process::exit(2);
            }
        },
        None => repl::interactive_loop(&mut interp, format),
    }
}
