use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use feedscout_core::check::{
    CheckFinding, CheckProgressCallback, DEFAULT_CHECK_BASE_URLS, DEFAULT_CHECK_PATHS, build_check_urls,
    checker_fetcher_config, execute_check, format_finding, generate_check_report,
};
use feedscout_core::config::{DiscoveryConfig, default_domains};
use feedscout_core::discover::{DiscoveryRun, FeedDiscovery};
use feedscout_core::report::{
    DiscoveryExport, exit_code, generate_json_report, generate_text_report, outcome_message,
    save_report,
};
use feedscout_scanner::{Fetcher, FetcherConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

// Helper functions for the discover handler

/// Domains from a file, else from `--domain` flags, else the built-in list.
pub fn load_domains_from_source(
    domains: &[String],
    domains_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    let mut loaded = match domains_file {
        Some(path) => load_domains_from_file(path)?,
        None => Vec::new(),
    };

    loaded.extend(domains.iter().filter_map(|d| normalize_domain(d)));

    if loaded.is_empty() {
        if domains_file.is_some() || !domains.is_empty() {
            return Err("No valid domains provided".to_string());
        }
        return Ok(default_domains());
    }

    Ok(loaded)
}

/// Load and normalize domains from a file
pub fn load_domains_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let domains: Vec<String> = read_list_file(path)?
        .iter()
        .filter_map(|line| normalize_domain(line))
        .collect();

    if domains.is_empty() {
        return Err(format!("No valid domains found in {}", path.display()));
    }

    Ok(domains)
}

/// Reduce a line to a bare host (with port, if any). Accepts full URLs.
pub fn normalize_domain(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let with_scheme = if line.contains("://") {
        line.to_string()
    } else {
        format!("https://{}", line)
    };

    match Url::parse(&with_scheme) {
        Ok(url) => url.host_str().filter(|h| !h.is_empty()).map(|host| match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }),
        Err(_) => {
            eprintln!("⚠️  Skipping invalid domain '{}'", line);
            None
        }
    }
}

/// Non-empty, non-comment lines of a file, trimmed.
pub fn read_list_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Base URLs for the checker: file, else `--url` flags, else the defaults.
pub fn load_check_base_urls(
    urls: &[Url],
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(path) = hosts_file {
        let lines = read_list_file(path)?;
        if lines.is_empty() {
            return Err(format!("No base URLs found in {}", path.display()));
        }
        return Ok(lines
            .into_iter()
            .map(|line| line.trim_end_matches('/').to_string())
            .collect());
    }

    if !urls.is_empty() {
        return Ok(urls
            .iter()
            .map(|u| u.as_str().trim_end_matches('/').to_string())
            .collect());
    }

    Ok(DEFAULT_CHECK_BASE_URLS.iter().map(|s| s.to_string()).collect())
}

pub fn load_check_paths(paths_file: Option<&PathBuf>) -> Result<Vec<String>, String> {
    match paths_file {
        Some(path) => {
            let paths = read_list_file(path)?;
            if paths.is_empty() {
                return Err(format!("No paths found in {}", path.display()));
            }
            Ok(paths)
        }
        None => Ok(DEFAULT_CHECK_PATHS.iter().map(|s| s.to_string()).collect()),
    }
}

fn spinner(quiet: bool) -> Option<Arc<ProgressBar>> {
    if quiet {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(Arc::new(pb))
}

fn build_discovery(args: &ArgMatches, progress: Option<Arc<ProgressBar>>) -> Result<FeedDiscovery> {
    let timeout = *args.get_one::<u64>("timeout").unwrap_or(&10);
    let delay_ms = *args.get_one::<u64>("delay-ms").unwrap_or(&500);
    let max_depth = *args.get_one::<usize>("max-depth").unwrap_or(&5);

    let fetcher = Fetcher::new(
        FetcherConfig::default()
            .with_timeout(Duration::from_secs(timeout))
            .with_request_delay(Duration::from_millis(delay_ms)),
    )?;
    let config = DiscoveryConfig::default().with_max_tag_depth(max_depth);

    let mut discovery = FeedDiscovery::new(fetcher, config);
    if let Some(pb) = progress {
        discovery = discovery.with_progress_callback(Arc::new(move |msg: String| {
            if msg.starts_with("🔍") {
                pb.set_message(msg.clone());
            }
            pb.println(msg);
        }));
    }
    Ok(discovery)
}

fn write_export(run: &DiscoveryRun, output: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(output);
    let path = PathBuf::from(expanded.as_ref());
    let export = DiscoveryExport::now(run);
    let json = generate_json_report(&export).context("Failed to serialize results")?;
    save_report(&json, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Runs discovery and returns the process exit code.
pub async fn handle_discover(args: &ArgMatches, quiet: bool) -> i32 {
    let domain_args: Vec<String> = args
        .get_many::<String>("domain")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let domains_file = args.get_one::<PathBuf>("domains-file");

    let domains = match load_domains_from_source(&domain_args, domains_file) {
        Ok(domains) => domains,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return 1;
        }
    };

    let progress = spinner(quiet);
    let discovery = match build_discovery(args, progress.clone()) {
        Ok(discovery) => discovery,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            return 1;
        }
    };

    println!(
        "{} Testing {} domains, {} endpoint patterns per domain\n",
        "→".blue(),
        domains.len().to_string().cyan(),
        discovery.config().feed_patterns.len().to_string().cyan()
    );

    let run = discovery.run_discovery(&domains).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print!("\n{}", generate_text_report(&run));

    if !args.get_flag("no-export") {
        let output = args
            .get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or(feedscout_core::config::DEFAULT_EXPORT_FILE);
        match write_export(&run, output) {
            Ok(path) => println!(
                "\n{} Results exported to: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            ),
            Err(e) => eprintln!("\n{} {:#}", "✗".red().bold(), e),
        }
    }

    let code = exit_code(&run);
    let message = outcome_message(&run);
    if code == 0 {
        println!("\n{}", message.green().bold());
    } else {
        println!("\n{}", message.yellow().bold());
    }
    code
}

pub async fn handle_check(args: &ArgMatches) -> i32 {
    let urls: Vec<Url> = args
        .get_many::<Url>("url")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let hosts_file = args.get_one::<PathBuf>("hosts-file");
    let paths_file = args.get_one::<PathBuf>("paths-file");
    let timeout = *args.get_one::<u64>("timeout").unwrap_or(&5);
    let insecure = args.get_flag("insecure");

    let targets = load_check_base_urls(&urls, hosts_file)
        .and_then(|bases| Ok((bases, load_check_paths(paths_file)?)))
        .and_then(|(bases, paths)| build_check_urls(&bases, &paths));
    let targets = match targets {
        Ok(targets) => targets,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return 1;
        }
    };

    let fetcher = match Fetcher::new(checker_fetcher_config(Duration::from_secs(timeout), insecure)) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return 1;
        }
    };

    println!("Checking {} URLs...", targets.len());

    let callback: CheckProgressCallback = Arc::new(|finding: &CheckFinding| {
        let line = format_finding(finding);
        match finding {
            CheckFinding::FoundXml { .. } => println!("{}", line.green()),
            CheckFinding::Redirect { .. } => println!("{}", line.cyan()),
        }
    });
    let findings = execute_check(&fetcher, &targets, Some(callback)).await;

    print!("{}", generate_check_report(&findings));
    0
}
