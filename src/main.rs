use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use cadence_analyzer::CommitStatsAnalyzer;
use cadence_core::{AnalysisResult, CadenceConfig, CommitStats, OutputFormat};
use cadence_gitpulse::mining::MiningOptions;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cadence",
    version,
    about = "Score how steady and genuine a repository's commit activity looks",
    long_about = "Cadence aggregates commit history into per-day statistics, scores how\n\
                   steady and hand-written the activity looks, flags suspicious patterns,\n\
                   and attaches a short written assessment.\n\n\
                   Examples:\n  \
                     cadence analyze                      Analyze the repository in the current directory\n  \
                     cadence analyze --since 90           Only look at the last 90 days\n  \
                     cadence analyze --stats stats.json   Analyze precomputed statistics\n  \
                     cadence stats --format json          Print the aggregated statistics\n  \
                     cadence init                         Create a .cadence.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .cadence.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summary (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Score commit activity and flag suspicious patterns
    #[command(long_about = "Score commit activity and flag suspicious patterns.\n\n\
        Statistics come from a JSON file (--stats, '-' for stdin) or are mined from\n\
        the git repository at --repo. A short written summary is requested from the\n\
        configured LLM unless [summary] is disabled or --no-summary is given.\n\n\
        Examples:\n  cadence analyze --repo ../service\n  cat stats.json | cadence analyze --stats - --format json")]
    Analyze {
        /// Read commit statistics from a JSON file ('-' for stdin)
        #[arg(long, conflicts_with_all = ["repo", "since", "branch", "ai_generated"])]
        stats: Option<PathBuf>,

        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Time range in days (default: from config, 365)
        #[arg(long)]
        since: Option<u64>,

        /// Branch to analyze (default: HEAD)
        #[arg(long)]
        branch: Option<String>,

        /// Mark the mined commit messages as synthetically produced
        #[arg(long)]
        ai_generated: bool,

        /// Skip the LLM summary and use the fixed fallback text
        #[arg(long)]
        no_summary: bool,
    },
    /// Print aggregated commit statistics for a repository
    #[command(long_about = "Print aggregated commit statistics for a repository.\n\n\
        Output with --format json is accepted as input by 'cadence analyze --stats'.\n\n\
        Examples:\n  cadence stats --format json > stats.json\n  cadence stats --since 30 --branch main")]
    Stats {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Time range in days (default: from config, 365)
        #[arg(long)]
        since: Option<u64>,

        /// Branch to analyze (default: HEAD)
        #[arg(long)]
        branch: Option<String>,

        /// Mark the mined commit messages as synthetically produced
        #[arg(long)]
        ai_generated: bool,
    },
    /// Create a default .cadence.toml configuration file
    #[command(long_about = "Create a default .cadence.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .cadence.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

const DEFAULT_CONFIG: &str = r#"# Cadence Configuration

[llm]
# OpenAI-compatible endpoint used for the written summary
# provider = "openai"
# model = "gpt-4o-mini"
# base_url = "http://localhost:11434"
# api_key = "..."   # or set OPENAI_API_KEY

[summary]
# enabled = true
# timeout_secs = 8

[history]
# since_days = 365
# branch = "main"
# skip_merges = true
"#;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,cadence=debug,cadence_analyzer=debug,cadence_gitpulse=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CadenceConfig> {
    let config = match path {
        Some(path) => CadenceConfig::from_file(path)
            .wrap_err_with(|| format!("loading {}", path.display()))?,
        None => {
            let default_path = Path::new(".cadence.toml");
            if default_path.exists() {
                CadenceConfig::from_file(default_path).wrap_err("loading .cadence.toml")?
            } else {
                CadenceConfig::default()
            }
        }
    };
    Ok(config)
}

fn read_stats_input(path: &Path) -> Result<CommitStats> {
    let content = if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .into_diagnostic()
            .wrap_err("reading stdin")?;
        input
    } else {
        std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display()))?
    };
    let stats = CommitStats::from_json(&content).wrap_err("parsing commit statistics")?;
    Ok(stats)
}

fn mine_stats(repo: &Path, options: &MiningOptions, ai_generated: bool) -> Result<CommitStats> {
    if git2::Repository::discover(repo).is_err() {
        miette::bail!(miette::miette!(
            help = "Run cadence from inside a git repository, or specify --repo, or pass --stats",
            "Not a git repository: {}",
            repo.display()
        ));
    }

    tracing::debug!(repo = %repo.display(), since_days = options.since_days, "mining git history");
    let commits = cadence_gitpulse::mining::mine_history(repo, options)?;
    Ok(cadence_gitpulse::aggregate::aggregate(&commits, ai_generated))
}

fn mining_options(config: &CadenceConfig, since: Option<u64>, branch: Option<String>) -> MiningOptions {
    let mut options = MiningOptions::from(&config.history);
    if let Some(days) = since {
        options.since_days = days;
    }
    if branch.is_some() {
        options.branch = branch;
    }
    options
}

fn score_color(score: u8) -> &'static str {
    match score {
        70..=100 => "\x1b[32m",
        40..=69 => "\x1b[33m",
        _ => "\x1b[31m",
    }
}

fn print_analysis(result: &AnalysisResult, format: OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            println!("# Commit Activity Analysis\n");
            println!("**Confidence score:** {}/100\n", result.confidence_score);
            println!("## Flags\n");
            if result.flags.is_empty() {
                println!("No anomalies detected.\n");
            } else {
                for flag in &result.flags {
                    println!("- {flag}");
                }
                println!();
            }
            println!("## Summary\n");
            println!("{}\n", result.ai_summary);
            if !result.timeline.is_empty() {
                println!("## Timeline\n");
                println!("| Date | Commits |");
                println!("|------|---------|");
                for entry in &result.timeline {
                    println!("| {} | {} |", entry.date, entry.commits);
                }
            }
        }
        OutputFormat::Text => {
            let score = result.confidence_score;
            if use_color {
                println!(
                    "Confidence score: \x1b[1m{}{score}\x1b[0m/100\n",
                    score_color(score)
                );
            } else {
                println!("Confidence score: {score}/100\n");
            }

            if result.flags.is_empty() {
                println!("Flags: none");
            } else {
                println!("Flags:");
                for flag in &result.flags {
                    println!("  - {flag}");
                }
            }
            println!("\nSummary:\n  {}", result.ai_summary);

            if !result.timeline.is_empty() {
                let peak = result.timeline.iter().map(|e| e.commits).max().unwrap_or(1).max(1);
                println!("\nTimeline:");
                for entry in &result.timeline {
                    let width = (entry.commits as usize * 40).div_ceil(peak as usize);
                    println!("  {}  {:<40} {}", entry.date, "#".repeat(width), entry.commits);
                }
            }
        }
    }
    Ok(())
}

fn print_stats(stats: &CommitStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(stats).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            println!("# Commit Statistics\n");
            println!("| Metric | Value |");
            println!("|--------|-------|");
            println!("| Total commits | {} |", stats.total_commits);
            println!("| Active days | {} |", stats.active_days);
            println!("| Busiest day | {} |", stats.max_commits_in_a_day);
            println!("| Message pattern | {} |", stats.commit_message_pattern);
        }
        OutputFormat::Text => {
            println!("Total commits:    {}", stats.total_commits);
            println!("Active days:      {}", stats.active_days);
            println!("Busiest day:      {} commits", stats.max_commits_in_a_day);
            println!("Message pattern:  {}", stats.commit_message_pattern);
            if let (Some(first), Some(last)) = (stats.timeline.first(), stats.timeline.last()) {
                println!("Window:           {} .. {}", first.date, last.date);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            Cli::command().print_help().into_diagnostic()?;
        }
        Some(Command::Analyze {
            ref stats,
            ref repo,
            since,
            ref branch,
            ai_generated,
            no_summary,
        }) => {
            let stats = match stats {
                Some(path) => read_stats_input(path)?,
                None => {
                    let options = mining_options(&config, since, branch.clone());
                    mine_stats(repo, &options, ai_generated)?
                }
            };

            if no_summary {
                config.summary.enabled = false;
            }
            let analyzer = CommitStatsAnalyzer::from_config(&config)?;

            let spinner = if analyzer.has_summarizer()
                && stats.total_commits > 0
                && std::io::stderr().is_terminal()
            {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .into_diagnostic()?,
                );
                pb.set_message("Writing summary...");
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let result = analyzer.analyze(&stats).await;

            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }

            print_analysis(&result, cli.format, use_color)?;
        }
        Some(Command::Stats {
            ref repo,
            since,
            ref branch,
            ai_generated,
        }) => {
            let options = mining_options(&config, since, branch.clone());
            let stats = mine_stats(repo, &options, ai_generated)?;
            print_stats(&stats, cli.format)?;
        }
        Some(Command::Init) => {
            let path = Path::new(".cadence.toml");
            if path.exists() {
                miette::bail!(miette::miette!(
                    help = "Edit the existing file, or remove it to regenerate",
                    ".cadence.toml already exists"
                ));
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .cadence.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cadence", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn stats_input_conflicts_with_explicit_repo() {
        let result =
            Cli::try_parse_from(["cadence", "analyze", "--stats", "s.json", "--repo", "../svc"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["cadence", "analyze", "--stats", "s.json"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Analyze { stats: Some(_), .. })));
    }

    #[test]
    fn default_config_template_parses() {
        let config = CadenceConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert!(config.summary.enabled);
    }

    #[test]
    fn flags_override_history_config() {
        let config = CadenceConfig::default();
        let options = mining_options(&config, Some(30), Some("dev".into()));
        assert_eq!(options.since_days, 30);
        assert_eq!(options.branch.as_deref(), Some("dev"));
        assert!(options.skip_merges);

        let options = mining_options(&config, None, None);
        assert_eq!(options.since_days, 365);
        assert!(options.branch.is_none());
    }

    #[test]
    fn score_colors_by_band() {
        assert_eq!(score_color(100), "\x1b[32m");
        assert_eq!(score_color(40), "\x1b[33m");
        assert_eq!(score_color(39), "\x1b[31m");
    }
}
