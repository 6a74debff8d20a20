pub const COMMAND_PREFIX: char = '\\';

pub const HELP_COMMAND: &str = "\\h";
pub const QUIT_COMMAND: &str = "\\q";
pub const TOKENS_COMMAND: &str = "\\t";
pub const VALUES_COMMAND: &str = "\\v";
pub const ENV_COMMAND: &str = "\\e";
pub const STATS_COMMAND: &str = "\\s";

#[derive(Debug, PartialEq, Eq)]
pub enum ParsedCommand {
    Eval(String),
    Help,
    Quit,
    ToggleTokens,
    ToggleValues,
    ListEnv,
    Stats,
    Unknown(String),
}

pub fn parse_command(line: String) -> ParsedCommand {
    match line.trim() {
        HELP_COMMAND => ParsedCommand::Help,
        QUIT_COMMAND => ParsedCommand::Quit,
        TOKENS_COMMAND => ParsedCommand::ToggleTokens,
        VALUES_COMMAND => ParsedCommand::ToggleValues,
        ENV_COMMAND => ParsedCommand::ListEnv,
        STATS_COMMAND => ParsedCommand::Stats,
        other if other.starts_with(COMMAND_PREFIX) => ParsedCommand::Unknown(other.to_owned()),
        _ => ParsedCommand::Eval(line),
    }
}

pub fn print_help() {
    println!();
    println!("{}    print this summary", HELP_COMMAND);
    println!("{}    exit the REPL", QUIT_COMMAND);
    println!("{}    toggle the token dump of each line", TOKENS_COMMAND);
    println!("{}    toggle the bit-level dump of each result", VALUES_COMMAND);
    println!("{}    list environment bindings", ENV_COMMAND);
    println!("{}    print heap statistics", STATS_COMMAND);
    println!();
}
