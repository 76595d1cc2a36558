use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use git_ignore_rules::builders::reporter::{ConsoleReporter, Reporter};
use git_ignore_rules::builders::rules::{Action, DirectoryMode, MoveDirection, Rule};
use git_ignore_rules::builders::storage::FileRepository;
use git_ignore_rules::builders::store::ActionResult;
use git_ignore_rules::core::config::{ConfigManager, ConfigProvider, Settings};
use git_ignore_rules::core::engine::IgnoreService;

use crate::{PathArgs, RuleArgs, RuleCommand};

/// Shape of the `export` output.
#[derive(Serialize)]
struct RuleExport<'a> {
    version: &'static str,
    source: String,
    rules: &'a [Rule],
}

/// Command handlers: resolve flags against the settings, call the service,
/// hand the outcome to the reporter.
pub struct App {
    config_manager: ConfigManager,
    settings: Settings,
    service: IgnoreService<FileRepository>,
    reporter: ConsoleReporter,
}

impl App {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_manager = ConfigManager::new(config_path);
        let settings = config_manager.load_config()?;
        let repository = FileRepository::new(settings.render.clone(), settings.parse_policy);

        Ok(Self {
            config_manager,
            settings,
            service: IgnoreService::new(repository),
            reporter: ConsoleReporter::new(),
        })
    }

    fn resolve_path(&self, target: &PathArgs) -> PathBuf {
        target
            .path
            .clone()
            .unwrap_or_else(|| self.settings.ignore_file.clone())
    }

    pub fn create(&mut self, target: PathArgs) -> Result<()> {
        let path = self.resolve_path(&target);
        self.service.init(&path)?;
        println!("✓ Created ignore file at {}", path.display());
        Ok(())
    }

    pub fn add(&mut self, command: RuleCommand) -> Result<()> {
        let (args, rules) = build_rules(command)?;
        let path = self.resolve_path(&args.target);
        let results = self.service.add_rules(&path, rules)?;
        self.reporter.report_results(&results);
        Ok(())
    }

    pub fn delete(&mut self, command: RuleCommand) -> Result<()> {
        let (args, rules) = build_rules(command)?;
        let path = self.resolve_path(&args.target);

        let mut results: Vec<ActionResult> = Vec::new();
        for rule in &rules {
            match self.service.delete_rule(&path, rule) {
                Ok(result) => results.push(result),
                Err(e) => {
                    self.reporter.report_results(&results);
                    return Err(e.into());
                }
            }
        }
        self.reporter.report_results(&results);
        Ok(())
    }

    pub fn move_rule(
        &mut self,
        target: PathArgs,
        source: &str,
        destination: &str,
        direction: &str,
    ) -> Result<()> {
        let direction: MoveDirection = direction.parse()?;
        let path = self.resolve_path(&target);
        let result = self.service.move_rule(&path, source, destination, direction)?;
        self.reporter.report_results(&[result]);
        Ok(())
    }

    pub fn analyze(&mut self, target: PathArgs, fix: bool, max: Option<usize>) -> Result<()> {
        let path = self.resolve_path(&target);
        let conflicts = self.service.analyze_conflicts(&path)?;
        self.reporter.report_conflicts(&conflicts);

        if fix && !conflicts.is_empty() {
            let max_attempts = max.unwrap_or(self.settings.autofix.max_attempts);
            let report = self.service.auto_fix(&path, max_attempts)?;
            self.reporter.report_fix(&report);
        }
        Ok(())
    }

    pub fn list(&mut self, target: PathArgs) -> Result<()> {
        let path = self.resolve_path(&target);
        let rules = self.service.list_rules(&path)?;
        self.reporter.report_rules(&rules);
        Ok(())
    }

    pub fn export(&mut self, target: PathArgs, output: &Path, format: &str) -> Result<()> {
        let path = self.resolve_path(&target);
        let rules = self.service.list_rules(&path)?;
        let document = RuleExport {
            version: "1.0",
            source: path.display().to_string(),
            rules: &rules,
        };

        let content = match format {
            "json" => serde_json::to_string_pretty(&document).context("Failed to serialize to JSON")?,
            "yaml" => serde_yaml::to_string(&document).context("Failed to serialize to YAML")?,
            "toml" => toml::to_string_pretty(&document).context("Failed to serialize to TOML")?,
            other => anyhow::bail!("Unsupported export format: {other} (expected json, yaml or toml)"),
        };

        fs::write(output, content).context("Failed to write export file")?;
        println!("✓ Exported {} rule(s) to {}", rules.len(), output.display());
        Ok(())
    }

    pub fn config(&mut self, write: bool) -> Result<()> {
        let config_path = self.config_manager.get_config_path().display().to_string();
        if write {
            if self.config_manager.initialize()? {
                println!("✓ Wrote default settings to {config_path}");
            } else {
                println!("ℹ️  Settings file {config_path} already exists");
            }
            return Ok(());
        }

        println!("{} {}", "Settings:".cyan().bold(), config_path);
        let rendered = toml::to_string_pretty(&self.settings).context("Failed to serialize config")?;
        println!("{rendered}");
        Ok(())
    }
}

/// Turns an add/delete subcommand into concrete rules, validating the
/// action and mode strings before anything is loaded.
fn build_rules(command: RuleCommand) -> Result<(RuleArgs, Vec<Rule>)> {
    let (args, rules) = match command {
        RuleCommand::File { args, filepath } => {
            let action: Action = args.action.parse()?;
            let rules = filepath
                .iter()
                .map(|p| Rule::file(p, action))
                .collect::<Result<Vec<_>, _>>()?;
            (args, rules)
        }
        RuleCommand::Directory { args, name, mode } => {
            let action: Action = args.action.parse()?;
            let mode: DirectoryMode = mode.parse()?;
            let rules = name
                .iter()
                .map(|n| Rule::directory(n, mode, action))
                .collect::<Result<Vec<_>, _>>()?;
            (args, rules)
        }
        RuleCommand::Extension { args, extension } => {
            let action: Action = args.action.parse()?;
            let rules = extension
                .iter()
                .map(|e| Rule::extension(e, action))
                .collect::<Result<Vec<_>, _>>()?;
            (args, rules)
        }
        RuleCommand::Glob { args, pattern } => {
            let action: Action = args.action.parse()?;
            let rules = pattern
                .iter()
                .map(|p| Rule::glob(p, action))
                .collect::<Result<Vec<_>, _>>()?;
            (args, rules)
        }
    };
    Ok((args, rules))
}
