use crate::CLAP_STYLING;
use clap::{arg, command};
use feedscout_core::config::DEFAULT_EXPORT_FILE;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("feedscout")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("feedscout")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("discover")
                .about(
                    "Probe domains for public XML feeds, follow their sitemaps, and classify \
                every XML document found.",
                )
                .arg(
                    arg!(-d --"domain" <DOMAIN>)
                        .required(false)
                        .help("A domain to probe (repeatable; default: built-in Cyprus agency list)")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-H --"domains-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of domains to probe")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the JSON export")
                        .default_value(DEFAULT_EXPORT_FILE),
                )
                .arg(
                    arg!(--"no-export")
                        .required(false)
                        .help("Skip writing the JSON export")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Pause after every request, in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("500"),
                )
                .arg(
                    arg!(--"max-depth" <DEPTH>)
                        .required(false)
                        .help("Deepest element level inspected for field names")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                ),
        )
        .subcommand(
            command!("check")
                .about(
                    "Quick check of base URLs against common feed paths. Reports URLs that \
                answer 200 with XML-looking content. Redirects are not followed: a 301/302 \
                is reported with its Location and the target is not checked.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("A base URL to check (repeatable)")
                        .value_parser(clap::value_parser!(Url))
                        .action(clap::ArgAction::Append)
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of base URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-p --"paths-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of paths to try")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"insecure")
                        .required(false)
                        .help("Do not verify TLS certificates")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_before_subcommand() {
        let matches = command_argument_builder()
            .try_get_matches_from(["feedscout", "-q", "discover"])
            .unwrap();
        assert!(matches.get_flag("quiet"));
    }

    #[test]
    fn test_quiet_after_subcommand() {
        let matches = command_argument_builder()
            .try_get_matches_from(["feedscout", "discover", "-q", "-d", "example.com"])
            .unwrap();
        assert!(matches.get_flag("quiet"));

        let matches = command_argument_builder()
            .try_get_matches_from(["feedscout", "check", "--quiet"])
            .unwrap();
        assert!(matches.get_flag("quiet"));
    }

    #[test]
    fn test_discover_defaults() {
        let matches = command_argument_builder()
            .try_get_matches_from(["feedscout", "discover"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "discover");
        assert_eq!(sub.get_one::<u64>("timeout"), Some(&10));
        assert_eq!(sub.get_one::<u64>("delay-ms"), Some(&500));
        assert_eq!(
            sub.get_one::<String>("output").map(String::as_str),
            Some(DEFAULT_EXPORT_FILE)
        );
    }

    #[test]
    fn test_check_help_mentions_redirects() {
        let mut cmd = command_argument_builder();
        let about = cmd
            .find_subcommand_mut("check")
            .and_then(|check| check.get_about().map(|a| a.to_string()))
            .unwrap();
        assert!(about.contains("Redirects are not followed"));
    }
}
