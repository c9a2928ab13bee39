//! semlint CLI - semantic HTML checker
//!
//! Reads HTML documents, runs the checker engine and renders the results
//! through the selected formatter.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use semlint::output::NamedReport;
use semlint::{
    Checker, Config, GroupedFormatter, JsonFormatter, OutputFormatter, Severity, TextFormatter,
    ALL_RULES,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "semlint",
    version,
    about = "Semantic HTML checker",
    long_about = "Heuristic linting for HTML: heading structure, accessibility, \
                  semantic markup and SEO cleanup."
)]
struct Cli {
    /// HTML files or directories to check
    files: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (default from configuration, else text)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value = "0")]
    jobs: usize,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Minimum severity to report
    #[arg(long, value_enum)]
    min_severity: Option<MinSeverity>,

    /// Page URL for the document (enables exact-URL checks; single file only)
    #[arg(long)]
    url: Option<String>,

    /// Show scan statistics
    #[arg(long)]
    stats: bool,

    /// Hide remediation text
    #[arg(long)]
    no_help: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Show detailed information about a rule and exit
    #[arg(long)]
    explain: Option<String>,

    /// Exit with 0 even if problems are found
    #[arg(long)]
    exit_zero: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Grouped,
}

#[derive(Clone, Copy, ValueEnum)]
enum MinSeverity {
    Info,
    Warning,
    Error,
}

impl MinSeverity {
    fn floor(self) -> Severity {
        match self {
            MinSeverity::Info => Severity::Info,
            MinSeverity::Warning => Severity::Warning,
            MinSeverity::Error => Severity::Error,
        }
    }
}

fn print_rule(rule: &semlint::Rule) {
    let severity = match rule.severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
        Severity::Info => "info".blue(),
    };
    println!("    {} [{}] ({})", rule.id.cyan(), severity, rule.category);
}

fn explain_rule(rule_id: &str) -> Result<()> {
    let rule = semlint::rule(rule_id)
        .with_context(|| format!("unknown rule '{}'", rule_id))?;
    println!("{} - {}", rule.id.cyan().bold(), rule.name.bold());
    println!("  category: {}", rule.category);
    println!("  severity: {}", rule.severity);
    println!("\n{}\n", rule.description);
    println!("{}\n  {}", "Remediation:".green(), rule.remediation);
    Ok(())
}

/// Expand directories into .html/.htm files, recursively
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut files)
                .with_context(|| format!("reading directory {}", path.display()))?;
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    Ok(files)
}

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_dir(&path, files)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("html") | Some("htm")
        ) {
            files.push(path);
        }
    }
    Ok(())
}

fn check_file(checker: &Checker, path: &Path) -> Result<NamedReport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let report = checker
        .check_source(&source)
        .with_context(|| format!("checking {}", path.display()))?;
    Ok((path.display().to_string(), report))
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.list_rules {
        println!("Available rules ({}):", ALL_RULES.len());
        for rule in ALL_RULES {
            print_rule(rule);
        }
        return;
    }

    if let Some(rule_id) = &cli.explain {
        if let Err(e) = explain_rule(rule_id) {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(2);
        }
        return;
    }

    match run(&cli) {
        Ok(exit_code) => {
            std::process::exit(if cli.exit_zero { 0 } else { exit_code });
        }
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let mut config = Config::discover(cli.config.as_deref())?;

    match config.output.color {
        semlint::ColorMode::Always => colored::control::set_override(true),
        semlint::ColorMode::Never => colored::control::set_override(false),
        semlint::ColorMode::Auto => {}
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Some(disabled) = &cli.disable {
        config.rules.disabled.extend(disabled.iter().cloned());
    }
    if let Some(selected) = &cli.select {
        config.rules.enabled.extend(selected.iter().cloned());
    }
    if cli.jobs > 0 {
        config.engine.jobs = cli.jobs;
    }
    if cli.url.is_some() {
        config.page_url = cli.url.clone();
    }

    let files = collect_files(&cli.files)?;
    if files.is_empty() {
        anyhow::bail!("no HTML files to check");
    }
    if cli.url.is_some() && files.len() > 1 {
        anyhow::bail!("--url applies to a single document");
    }

    let checker = Checker::new(config.clone())?;

    let mut reports: Vec<NamedReport> = if config.engine.parallel && files.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(if config.engine.jobs > 0 {
                config.engine.jobs
            } else {
                num_cpus::get()
            })
            .build()
            .context("building thread pool")?;
        pool.install(|| {
            files
                .par_iter()
                .map(|f| check_file(&checker, f))
                .collect::<Result<Vec<_>>>()
        })?
    } else {
        files
            .iter()
            .map(|f| check_file(&checker, f))
            .collect::<Result<Vec<_>>>()?
    };

    if let Some(min) = cli.min_severity {
        let floor = min.floor();
        for (_, report) in &mut reports {
            report.issues.retain(|issue| issue.severity >= floor);
        }
    }

    let format = cli.format.unwrap_or(match config.output.format {
        semlint::OutputFormat::Text => Format::Text,
        semlint::OutputFormat::Json => Format::Json,
        semlint::OutputFormat::Grouped => Format::Grouped,
    });
    let show_stats = cli.stats || config.output.statistics;

    let formatter: Box<dyn OutputFormatter> = match format {
        Format::Text => {
            let mut text = TextFormatter::new();
            if show_stats {
                text = text.with_stats();
            }
            if cli.no_help {
                text = text.without_remediation();
            }
            Box::new(text)
        }
        Format::Json => Box::new(JsonFormatter::new()),
        Format::Grouped => Box::new(GroupedFormatter::new()),
    };

    print!("{}", formatter.format(&reports));

    Ok(reports
        .iter()
        .map(|(_, report)| report.exit_code())
        .max()
        .unwrap_or(0))
}
