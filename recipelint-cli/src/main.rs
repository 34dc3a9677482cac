mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use config::{ConfigMerger, LintArgs, MergedConfig};
use recipelint_core::adapters::FsFixPort;
use recipelint_core::ports::RunEvents;
use recipelint_core::{run_lint, OutputSink, RunSettings, FATAL_EXIT_CODE};
use recipelint_rules::{load_constants, load_rule_file, Constants, RuleSet};
use recipelint_stash::{Stash, StashError};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "recipelint",
    version,
    about = "Check BitBake recipes and their appends against a style guide."
)]
struct Cli {
    /// Recipe (.bb) and append (.bbappend) files to check.
    #[arg(required = true)]
    files: Vec<Utf8PathBuf>,

    /// Rule id to suppress (repeatable).
    #[arg(long)]
    suppress: Vec<String>,

    /// Where to flush the findings (default: stderr).
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Automatically try to fix the issues.
    #[arg(long, default_value_t = false)]
    fix: bool,

    /// Don't create backup files when auto fixing.
    #[arg(long, visible_alias = "no-backup", default_value_t = false)]
    nobackup: bool,

    /// JSON rule file selecting rules and overriding their severity.
    #[arg(long)]
    rulefile: Option<Utf8PathBuf>,

    /// JSON constant file replacing the built-in variable lists.
    #[arg(long)]
    constantfile: Option<Utf8PathBuf>,

    /// Add color to the output based on the severity.
    #[arg(long, default_value_t = false)]
    color: bool,

    /// Print findings only.
    #[arg(long, default_value_t = false)]
    quiet: bool,

    /// Don't print information level findings.
    #[arg(long, default_value_t = false)]
    noinfo: bool,

    /// Don't print warning level findings.
    #[arg(long, default_value_t = false)]
    nowarn: bool,

    /// Config file (default: ./recipelint.toml if present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

impl Cli {
    fn lint_args(&self) -> LintArgs {
        LintArgs {
            suppress: self.suppress.clone(),
            color: self.color,
            nowarn: self.nowarn,
            noinfo: self.noinfo,
            quiet: self.quiet,
            nobackup: self.nobackup,
            rulefile: self.rulefile.clone(),
            constantfile: self.constantfile.clone(),
        }
    }
}

/// Prints user-facing progress to stdout unless quiet.
struct ConsoleEvents {
    quiet: bool,
}

impl RunEvents for ConsoleEvents {
    fn file_unreadable(&mut self, err: &StashError) {
        if !self.quiet {
            println!("Can't open/read: {err}");
        }
    }

    fn files_checked(&mut self, done: usize, total: usize) {
        if !self.quiet {
            println!("{done}/{total} files checked");
        }
    }

    fn fixes_applied(&mut self, path: &Utf8Path) {
        if !self.quiet {
            let shown = std::path::absolute(path)
                .ok()
                .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
                .unwrap_or_else(|| path.to_path_buf());
            println!("{shown}:debug:Applied automatic fixes");
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match real_main(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:?}", e);
            println!("OOPS - unexpected failure while linting {:?}", cli.files);
            println!("{e:?}");
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}

fn load_merged_config(cli: &Cli) -> anyhow::Result<MergedConfig> {
    let file_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(Utf8Path::new(".")).context("load recipelint.toml config")?,
    };
    Ok(ConfigMerger::new(file_config).merge_lint_args(&cli.lint_args()))
}

fn load_rules(merged: &MergedConfig) -> anyhow::Result<RuleSet> {
    let constants = match &merged.constantfile {
        Some(path) => load_constants(path).context("load constant file")?,
        None => Constants::default(),
    };
    let rule_file = match &merged.rulefile {
        Some(path) => Some(load_rule_file(path).context("load rule file")?),
        None => None,
    };
    Ok(RuleSet::load(&constants, rule_file.as_ref(), &merged.suppress))
}

fn real_main(cli: &Cli) -> anyhow::Result<u8> {
    let merged = load_merged_config(cli)?;
    debug!(
        "merged config: suppress={:?}, backups={:?}, rulefile={:?}, constantfile={:?}",
        merged.suppress, merged.backups, merged.rulefile, merged.constantfile
    );

    let rules = load_rules(&merged)?;
    if !merged.quiet {
        println!("Loaded rules:\n\t{}", rules.loaded_ids().join("\n\t"));
    }

    let settings = RunSettings {
        fix: cli.fix,
        backup_enabled: merged.backups.enabled,
        backup_suffix: merged.backups.suffix.clone(),
        color: merged.color,
        nowarn: merged.nowarn,
        noinfo: merged.noinfo,
        output: cli
            .output
            .clone()
            .map_or(OutputSink::Stderr, OutputSink::File),
    };

    let mut events = ConsoleEvents {
        quiet: merged.quiet,
    };
    let outcome = run_lint(
        &cli.files,
        &rules,
        &settings,
        Stash::new,
        &FsFixPort,
        &mut events,
    );

    outcome.report.write_to(&settings.output)?;
    outcome.fix_result()?;
    Ok(outcome.report.exit_code())
}
