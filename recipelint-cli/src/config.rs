//! Configuration file loading for recipelint.
//!
//! Discovers and loads `recipelint.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "recipelint.toml";

/// Top-level configuration from recipelint.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipelintConfig {
    /// Rule selection and output filtering.
    pub lint: LintConfig,

    /// Backup settings for `--fix`.
    pub backups: BackupsConfig,
}

/// Lint section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Rule ids to suppress.
    pub suppress: Vec<String>,

    pub color: bool,
    pub nowarn: bool,
    pub noinfo: bool,
    pub quiet: bool,

    /// JSON rule file; relative paths are resolved against the config file.
    pub rulefile: Option<Utf8PathBuf>,

    /// JSON constant file; relative paths are resolved against the config file.
    pub constantfile: Option<Utf8PathBuf>,
}

/// Backups section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to rename files to a backup before rewriting them.
    pub enabled: bool,

    /// Suffix appended to the original path.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suffix: ".bak".to_string(),
        }
    }
}

/// Discover the recipelint.toml config file in `dir`.
///
/// Returns `None` if no config file is found.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a recipelint.toml config file.
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<RecipelintConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    let mut config = parse_config(&contents).with_context(|| format!("parse config file {}", path))?;

    if let Some(base) = path.parent() {
        for file in [&mut config.lint.rulefile, &mut config.lint.constantfile]
            .into_iter()
            .flatten()
        {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }
    Ok(config)
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<RecipelintConfig> {
    let config: RecipelintConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the config from `dir`, or return the default if there is none.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<RecipelintConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(RecipelintConfig::default()),
    }
}

/// Lint-related CLI arguments, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct LintArgs {
    pub suppress: Vec<String>,
    pub color: bool,
    pub nowarn: bool,
    pub noinfo: bool,
    pub quiet: bool,
    pub nobackup: bool,
    pub rulefile: Option<Utf8PathBuf>,
    pub constantfile: Option<Utf8PathBuf>,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedConfig {
    /// Suppressed ids (from config file, extended by CLI).
    pub suppress: Vec<String>,

    pub color: bool,
    pub nowarn: bool,
    pub noinfo: bool,
    pub quiet: bool,

    pub rulefile: Option<Utf8PathBuf>,
    pub constantfile: Option<Utf8PathBuf>,

    /// Backup settings.
    pub backups: BackupsConfig,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: RecipelintConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: RecipelintConfig) -> Self {
        Self { config }
    }

    /// Merge with the CLI arguments.
    ///
    /// The CLI `suppress` list extends the config file list. Boolean flags
    /// are enabled by either side. CLI file paths replace the config file's.
    /// `--nobackup` always disables backups.
    pub fn merge_lint_args(self, args: &LintArgs) -> MergedConfig {
        let lint = self.config.lint;

        let mut suppress = lint.suppress;
        for id in &args.suppress {
            if !suppress.contains(id) {
                suppress.push(id.clone());
            }
        }

        let mut backups = self.config.backups;
        if args.nobackup {
            backups.enabled = false;
        }

        MergedConfig {
            suppress,
            color: args.color || lint.color,
            nowarn: args.nowarn || lint.nowarn,
            noinfo: args.noinfo || lint.noinfo,
            quiet: args.quiet || lint.quiet,
            rulefile: args.rulefile.clone().or(lint.rulefile),
            constantfile: args.constantfile.clone().or(lint.constantfile),
            backups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_example_config() {
        let contents = r#"
[lint]
suppress = ["oelint.tabs.notabs", "oelint.var.mandatoryvar.HOMEPAGE"]
color = true
nowarn = false
noinfo = true
rulefile = "rules.json"

[backups]
enabled = false
suffix = ".orig"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.lint.suppress.len(), 2);
        assert!(config.lint.color);
        assert!(!config.lint.nowarn);
        assert!(config.lint.noinfo);
        assert_eq!(config.lint.rulefile, Some(Utf8PathBuf::from("rules.json")));
        assert_eq!(config.lint.constantfile, None);
        assert!(!config.backups.enabled);
        assert_eq!(config.backups.suffix, ".orig");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.lint.suppress.is_empty());
        assert_eq!(config.backups, BackupsConfig::default());
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = parse_config("[lint]\ncolor = \"yes\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_merge_cli_extends_suppress() {
        let config = RecipelintConfig {
            lint: LintConfig {
                suppress: vec!["a".to_string(), "b".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let args = LintArgs {
            suppress: vec!["b".to_string(), "c".to_string()],
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_lint_args(&args);
        assert_eq!(merged.suppress, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_flags_from_either_side() {
        let config = RecipelintConfig {
            lint: LintConfig {
                color: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let args = LintArgs {
            nowarn: true,
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_lint_args(&args);
        assert!(merged.color);
        assert!(merged.nowarn);
        assert!(!merged.noinfo);
        assert!(!merged.quiet);
    }

    #[test]
    fn test_merge_cli_paths_override() {
        let config = RecipelintConfig {
            lint: LintConfig {
                rulefile: Some("file.json".into()),
                constantfile: Some("consts.json".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let args = LintArgs {
            rulefile: Some("cli.json".into()),
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_lint_args(&args);
        assert_eq!(merged.rulefile, Some(Utf8PathBuf::from("cli.json")));
        assert_eq!(merged.constantfile, Some(Utf8PathBuf::from("consts.json")));
    }

    #[test]
    fn test_nobackup_wins_over_config() {
        let merged = ConfigMerger::new(RecipelintConfig::default()).merge_lint_args(&LintArgs {
            nobackup: true,
            ..Default::default()
        });
        assert!(!merged.backups.enabled);
        assert_eq!(merged.backups.suffix, ".bak");
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_config_resolves_relative_paths() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        std::fs::write(
            root.join(CONFIG_FILE_NAME),
            "[lint]\nrulefile = \"rules.json\"\nconstantfile = \"/abs/c.json\"\n",
        )
        .expect("write config");

        let cfg = load_or_default(&root).expect("load config");
        assert_eq!(cfg.lint.rulefile, Some(root.join("rules.json")));
        assert_eq!(cfg.lint.constantfile, Some(Utf8PathBuf::from("/abs/c.json")));
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert!(cfg.lint.suppress.is_empty());
        assert!(cfg.backups.enabled);
    }
}
