//! cliffi - call shared library functions directly from your shell.
//!
//! Thin CLI wrapper around `cliffi-core`: collects the tokens, runs the
//! parse/marshal/load/dispatch pipeline once, prints the formatted
//! return value, and maps each error class to a distinct exit code.

use std::process;

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};

use cliffi_core::{execute, CallDescriptor};

#[derive(Parser)]
#[command(
    name = "cliffi",
    version = env!("CARGO_PKG_VERSION"),
    about = "Call shared library functions directly from your shell",
    long_about = r#"
cliffi invokes an arbitrary exported function in a shared library without
any compiled calling code. Supply the library path, the return type tag,
the function name, and alternating type-tag/value argument pairs; cliffi
loads the library, resolves the symbol, builds the native call through
libffi, and prints the formatted return value.

Type tags:
  c char     h short     i int     l long        (uppercase for unsigned)
  f float    d double    b bool    s string
  p pointer (hex address)          v void (return type only)
Word aliases (int, double, string, ...) are also accepted.

cliffi does not verify that the declared signature matches the library's
actual ABI. A wrong signature can crash the invoked code; that is the
caller's responsibility.

Examples:
  cliffi libexample.so i addints i 3 i 4
  cliffi path/to/libexample.so v dofoo
  cliffi ./libexample.so s concatstrings s hello s world
  cliffi libexample.so d multdoubles d 1.5 d 1.5
"#,
    after_help = r#"
Environment Variables:
  CLIFFI_DEBUG=1            Enable debug logging
  CLIFFI_LOG_LEVEL=debug    Set log level (error, warn, info, debug, trace)

Exit codes:
  0  success
  2  usage or signature parse error
  3  argument value conversion error
  4  library load error
  5  symbol not found
  6  call dispatch failure
"#
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, env = "CLIFFI_DEBUG", value_parser = parse_bool_env)]
    debug: bool,

    /// Set log level
    #[arg(long, value_enum, env = "CLIFFI_LOG_LEVEL", default_value = "warn")]
    log_level: LogLevel,

    /// Log the parsed call descriptor and each marshaled argument
    #[arg(short, long)]
    verbose: bool,

    /// Path to the shared library, or its bare name if on the loader path
    library: String,

    /// Return type tag (v for void, i for int, s for string, ...)
    return_type: String,

    /// Name of the exported function to invoke
    function: String,

    /// Alternating type-tag / value tokens for the arguments
    #[arg(value_name = "TYPE VALUE", num_args = 0.., allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn parse_bool_env(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{s}'. Expected: 1/0, true/false, yes/no, on/off"
        )),
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        log::LevelFilter::Debug
    } else if cli.verbose {
        log::LevelFilter::Info.max(cli.log_level.into())
    } else {
        cli.log_level.into()
    };

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .filter_level(log_level)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("cliffi: {err}");
        process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> cliffi_core::Result<()> {
    let tokens = signature_tokens(cli);
    let descriptor = CallDescriptor::parse(&cli.library, &tokens)?;

    info!(
        "calling {}!{} with {} argument(s), returning {}",
        descriptor.library_path,
        descriptor.function_name,
        descriptor.args.len(),
        descriptor.return_type
    );
    for (i, (tag, value)) in descriptor.args.iter().enumerate() {
        debug!("arg {i}: {tag} = {value:?}");
    }

    let formatted = execute(&descriptor)?;
    println!("Function returned: {formatted}");
    Ok(())
}

/// Reassemble the signature token stream the parser expects:
/// `[return_tag, function_name, (arg_tag, arg_value)*]`.
fn signature_tokens(cli: &Cli) -> Vec<String> {
    let mut tokens = Vec::with_capacity(2 + cli.args.len());
    tokens.push(cli.return_type.clone());
    tokens.push(cli.function.clone());
    tokens.extend(cli.args.iter().cloned());
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_positional_layout() {
        let cli = parse_cli(&["cliffi", "libtest.so", "i", "add", "i", "2", "i", "3"]);
        assert_eq!(cli.library, "libtest.so");
        assert_eq!(
            signature_tokens(&cli),
            vec!["i", "add", "i", "2", "i", "3"]
        );
    }

    #[test]
    fn test_negative_values_are_accepted() {
        let cli = parse_cli(&["cliffi", "libtest.so", "i", "neg", "i", "-5"]);
        assert_eq!(cli.args, vec!["i", "-5"]);
    }

    #[test]
    fn test_missing_positionals_is_usage_error() {
        assert!(Cli::try_parse_from(["cliffi", "libtest.so"]).is_err());
    }

    #[test]
    fn test_void_call_has_no_arg_tokens() {
        let cli = parse_cli(&["cliffi", "libtest.so", "v", "dofoo"]);
        assert!(cli.args.is_empty());
        assert_eq!(signature_tokens(&cli), vec!["v", "dofoo"]);
    }
}
