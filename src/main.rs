use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use treeshift::config::{
    load_pipeline, FailurePolicy, RunConfig, DEFAULT_OUTPUT, DEFAULT_PATTERN, DEFAULT_ROOT,
};
use treeshift::{run, Pipeline, RenameDecl, RenameIdent, RunReport};

#[derive(Parser)]
#[command(name = "treeshift")]
#[command(
    about = "Apply structural rename rules to Rust sources and write the changes as a unified-diff patch",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Directory searched recursively for source files
    #[arg(short, long, default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Glob matched against file names
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Patch file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// TOML rule set; its rules run before any command-line rule
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Rename item declarations only (repeatable)
    #[arg(long = "rename-decl", value_name = "FROM=TO", value_parser = parse_rename)]
    rename_decl: Vec<(String, String)>,

    /// Rename every identifier occurrence (repeatable)
    #[arg(long, value_name = "FROM=TO", value_parser = parse_rename)]
    rename: Vec<(String, String)>,

    /// Skip files that fail and still write the patch of the others
    #[arg(short = 'k', long)]
    keep_going: bool,

    /// Log every pipeline stage to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_rename(arg: &str) -> Result<(String, String), String> {
    let (from, to) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FROM=TO, got '{arg}'"))?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(format!("expected FROM=TO, got '{arg}'"));
    }
    Ok((from.to_string(), to.to_string()))
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "treeshift=debug"
    } else {
        "treeshift=error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(report) => {
            print_report(&report);
            if !report.is_success() {
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{} {}", "error:".red(), err);
            process::exit(1);
        }
    }
}

fn execute(cli: Cli) -> Result<RunReport> {
    let pipeline = build_pipeline(&cli)?;
    let failure_policy = if cli.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let config = RunConfig::new(pipeline)
        .with_root(cli.root)
        .with_pattern(cli.pattern)
        .with_output(cli.output)
        .with_failure_policy(failure_policy);

    Ok(run(&config)?)
}

/// Rules file first, then `--rename-decl`, then `--rename`.
fn build_pipeline(cli: &Cli) -> Result<Pipeline> {
    let mut pipeline = match &cli.rules {
        Some(path) => load_pipeline(path)?,
        None => Pipeline::new(),
    };
    for (from, to) in &cli.rename_decl {
        pipeline.push(RenameDecl::new(from, to)?);
    }
    for (from, to) in &cli.rename {
        pipeline.push(RenameIdent::new(from, to)?);
    }

    if pipeline.is_empty() {
        eprintln!(
            "{}",
            "Warning: no rules given, the patch will be empty".yellow()
        );
    }
    Ok(pipeline)
}

fn print_report(report: &RunReport) {
    for failure in &report.failures {
        eprintln!("{} {}", "✗".red(), failure);
    }

    println!(
        "{}",
        format!("Patch written to {}", report.output.display()).green()
    );
    println!("{}", "Summary:".bold());
    println!("  {} files processed", report.files_processed);
    println!(
        "  {} changed",
        format!("{}", report.files_changed).green()
    );
    println!(
        "  {} insertions(+), {} deletions(-)",
        report.stats.insertions, report.stats.deletions
    );
    if !report.failures.is_empty() {
        println!(
            "  {} failed",
            format!("{}", report.failures.len()).red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rename_splits_on_first_equals() {
        assert_eq!(
            parse_rename("foo=bar").unwrap(),
            ("foo".to_string(), "bar".to_string())
        );
        assert_eq!(
            parse_rename(" foo = bar ").unwrap(),
            ("foo".to_string(), "bar".to_string())
        );
    }

    #[test]
    fn parse_rename_rejects_malformed_pairs() {
        assert!(parse_rename("foo").is_err());
        assert!(parse_rename("=bar").is_err());
        assert!(parse_rename("foo=").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn rules_are_ordered_decl_before_ident() {
        let cli = Cli::parse_from([
            "treeshift",
            "--rename",
            "a=b",
            "--rename-decl",
            "c=d",
            "--rename",
            "e=f",
        ]);
        let pipeline = build_pipeline(&cli).unwrap();
        let names: Vec<_> = pipeline.rule_names().collect();
        assert_eq!(
            names,
            vec![
                "rename-decl(c -> d)",
                "rename-ident(a -> b)",
                "rename-ident(e -> f)"
            ]
        );
    }
}
