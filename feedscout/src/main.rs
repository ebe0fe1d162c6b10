use commands::command_argument_builder;
use feedscout::handlers::{handle_check, handle_discover};
use feedscout_core::print_banner;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if !quiet {
        print_banner();
    }

    let code = match chosen_command.subcommand() {
        Some(("check", primary_command)) => handle_check(primary_command).await,
        Some(("discover", primary_command)) => handle_discover(primary_command, quiet).await,
        None => {
            // Bare invocation runs discovery with every default
            let defaults = command_argument_builder().get_matches_from(["feedscout", "discover"]);
            match defaults.subcommand() {
                Some((_, primary_command)) => handle_discover(primary_command, quiet).await,
                None => 1,
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    };

    debug!("exiting with status {}", code);
    std::process::exit(code);
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
