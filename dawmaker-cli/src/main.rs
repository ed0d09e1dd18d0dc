use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use dawmaker_codegen::{CodeGenerator, ExportError, Exporter};
use dawmaker_model::{
    lint, load_layout, save_layout, ErrorEntry, Framework, LayoutDocument, LoadError, PluginFormat,
    ProjectTemplate, Severity, ValidationReport,
};

const LAYOUT_FILE: &str = "layout.json";

#[derive(Parser)]
#[command(name = "dawmaker", about = "dawmaker – audio plugin GUI exporter")]
#[command(version, propagate_version = true)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a layout from a starter template
    Init {
        /// Plugin name
        name: String,
        /// Target directory (defaults to ./<name>)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Starter template
        #[arg(short, long, default_value = "audio-effect")]
        template: ProjectTemplate,
        /// Target framework
        #[arg(short, long, default_value = "juce")]
        framework: Framework,
        /// Manufacturer name
        #[arg(short, long, default_value = "dawmaker")]
        manufacturer: String,
    },
    /// Load and lint a layout, printing every diagnostic
    Check {
        /// Layout file or its directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Show the files an export would produce
    Preview {
        /// Layout file or its directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Override the layout's framework
        #[arg(short, long)]
        framework: Option<Framework>,
        /// Print the content of one generated file
        #[arg(long)]
        file: Option<String>,
    },
    /// Generate the framework project on disk
    Export {
        /// Layout file or its directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Output directory (defaults to <layout dir>/export/<framework>)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the layout's framework
        #[arg(short, long)]
        framework: Option<Framework>,
        /// Override the plugin name
        #[arg(short, long)]
        name: Option<String>,
        /// Override the manufacturer
        #[arg(short, long)]
        manufacturer: Option<String>,
        /// Override the packaging formats
        #[arg(long = "format", num_args = 1..)]
        formats: Vec<PluginFormat>,
    },
    /// Print the layout JSON Schema
    Schema,
}

/// Metadata overrides given on the command line.
#[derive(Debug, Default)]
struct Overrides {
    framework: Option<Framework>,
    name: Option<String>,
    manufacturer: Option<String>,
    formats: Vec<PluginFormat>,
}

impl Overrides {
    fn apply(self, doc: &mut LayoutDocument) {
        if let Some(framework) = self.framework {
            doc.plugin.framework = framework;
        }
        if let Some(name) = self.name {
            doc.plugin.name = name;
        }
        if let Some(manufacturer) = self.manufacturer {
            doc.plugin.manufacturer = manufacturer;
        }
        if !self.formats.is_empty() {
            doc.plugin.formats = self.formats;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Init {
            name,
            dir,
            template,
            framework,
            manufacturer,
        } => cmd_init(&name, dir.as_deref(), template, framework, &manufacturer),
        Command::Check { path } => cmd_check(&path),
        Command::Preview {
            path,
            framework,
            file,
        } => cmd_preview(&path, framework, file.as_deref()),
        Command::Export {
            path,
            output,
            framework,
            name,
            manufacturer,
            formats,
        } => cmd_export(
            &path,
            output.as_deref(),
            Overrides {
                framework,
                name,
                manufacturer,
                formats,
            },
        ),
        Command::Schema => cmd_schema(),
    };

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// A layout path may name the file or the directory holding `layout.json`.
fn resolve_layout(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(LAYOUT_FILE)
    } else {
        path.to_path_buf()
    }
}

fn cmd_init(
    name: &str,
    dir: Option<&Path>,
    template: ProjectTemplate,
    framework: Framework,
    manufacturer: &str,
) -> Result<bool> {
    if name.trim().is_empty() {
        anyhow::bail!("Plugin name must not be empty");
    }
    let project_dir = match dir {
        Some(d) => d.to_path_buf(),
        None => {
            validate_default_dir_name(name)?;
            PathBuf::from(name)
        }
    };

    let layout_path = project_dir.join(LAYOUT_FILE);
    if layout_path.exists() {
        anyhow::bail!("'{}' already exists", layout_path.display());
    }

    let doc = template.layout(name, manufacturer, framework);
    save_layout(&layout_path, &doc)
        .with_context(|| format!("Failed to write '{}'", layout_path.display()))?;

    println!(
        "{} Created '{}' from the {} template at {}",
        "✓".green().bold(),
        name.bold(),
        template.name(),
        project_dir.display()
    );
    println!("  {} {} ({} widgets)", "→".dimmed(), LAYOUT_FILE, doc.widgets.len());
    println!();
    println!("Next steps:");
    println!("  {} check {}", "dawmaker".dimmed(), project_dir.display());
    println!("  {} export {}", "dawmaker".dimmed(), project_dir.display());

    Ok(true)
}

fn validate_default_dir_name(name: &str) -> Result<()> {
    if name.contains('/') || name.contains('\\') {
        anyhow::bail!("Plugin name must not contain path separators");
    }

    let mut components = Path::new(name).components();
    let Some(first) = components.next() else {
        anyhow::bail!("Plugin name must not be empty");
    };

    if components.next().is_some() {
        anyhow::bail!("Plugin name must be a single path component");
    }

    match first {
        std::path::Component::Normal(_) => Ok(()),
        _ => anyhow::bail!("Plugin name must be a normal directory name"),
    }
}

fn print_entries(entries: &[ErrorEntry]) {
    for entry in entries {
        let severity_str = match entry.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };

        println!(
            "  {} [{}] {} ({}:{})",
            severity_str,
            entry.code.dimmed(),
            entry.message,
            entry.file.dimmed(),
            entry.path.dimmed(),
        );

        if let Some(suggestion) = &entry.suggestion {
            println!("    {} {}", "hint:".cyan(), suggestion);
        }
    }
}

/// Load a layout. Unusable files print their diagnostics and yield `None`;
/// missing or unreadable files are errors.
fn load(path: &Path) -> Result<Option<(LayoutDocument, ValidationReport)>> {
    let layout_path = resolve_layout(path);
    match load_layout(&layout_path) {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e @ (LoadError::Parse(_) | LoadError::Schema(_))) => {
            println!("{} {}", "✗".red().bold(), e);
            print_entries(&e.entries());
            Ok(None)
        }
        Err(e) => Err(e)
            .with_context(|| format!("Failed to load layout at '{}'", layout_path.display())),
    }
}

fn cmd_check(path: &Path) -> Result<bool> {
    let Some((doc, report)) = load(path)? else {
        return Ok(false);
    };

    println!("{}", "Plugin".bold().underline());
    println!("  Name:         {}", doc.plugin.name);
    println!("  Manufacturer: {}", doc.plugin.manufacturer);
    println!("  Version:      {}", doc.plugin.version);
    println!("  Framework:    {}", doc.plugin.framework);
    let formats: Vec<String> = doc
        .plugin
        .effective_formats()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("  Formats:      {}", formats.join(", "));
    println!("  Widgets:      {}", doc.widgets.len());

    if !report.errors.is_empty() {
        println!();
        print_entries(&report.errors);
    }

    let error_count = report.count(Severity::Error);
    let warning_count = report.count(Severity::Warning);
    println!();
    if error_count == 0 && warning_count == 0 {
        println!("{} Layout is valid", "✓".green().bold());
        Ok(true)
    } else if error_count == 0 {
        println!(
            "{} Valid with {} warning(s)",
            "⚠".yellow().bold(),
            warning_count,
        );
        Ok(true)
    } else {
        println!(
            "{} {} error(s), {} warning(s)",
            "✗".red().bold(),
            error_count,
            warning_count,
        );
        Ok(false)
    }
}

fn cmd_preview(path: &Path, framework: Option<Framework>, file: Option<&str>) -> Result<bool> {
    let Some((mut doc, _report)) = load(path)? else {
        return Ok(false);
    };
    Overrides {
        framework,
        ..Overrides::default()
    }
    .apply(&mut doc);

    let framework = doc.plugin.framework;
    let generated = CodeGenerator::new(framework)
        .generate(&doc.widgets, &doc.plugin)
        .with_context(|| format!("Failed to generate {framework} project"))?;

    match file {
        Some(wanted) => match generated.get(wanted) {
            Some(content) => {
                print!("{content}");
                Ok(true)
            }
            None => {
                let known: Vec<&str> = generated.files().keys().map(String::as_str).collect();
                anyhow::bail!(
                    "'{wanted}' is not generated for {framework}; files: {}",
                    known.join(", ")
                )
            }
        },
        None => {
            println!(
                "{} {} file(s) for {}",
                "Preview:".bold(),
                generated.file_count(),
                framework
            );
            for (rel_path, content) in generated.files() {
                println!(
                    "  {} {} {}",
                    "→".dimmed(),
                    rel_path,
                    format!("({} lines)", content.lines().count()).dimmed()
                );
            }
            Ok(true)
        }
    }
}

fn cmd_export(path: &Path, output: Option<&Path>, overrides: Overrides) -> Result<bool> {
    let layout_path = resolve_layout(path);
    println!(
        "{} {}",
        "Exporting".bold(),
        layout_path
            .canonicalize()
            .unwrap_or_else(|_| layout_path.clone())
            .display()
    );

    // 1. Load & lint
    let Some((mut doc, _)) = load(path)? else {
        return Ok(false);
    };
    overrides.apply(&mut doc);
    let report = lint::check(&doc, LAYOUT_FILE);

    if report.has_errors() {
        print_entries(&report.errors);
        eprintln!(
            "{} {} error(s) in the layout; fix them before exporting",
            "✗".red().bold(),
            report.count(Severity::Error)
        );
        return Ok(false);
    }

    // 2. Export
    let framework = doc.plugin.framework;
    let output_dir = match output {
        Some(d) => d.to_path_buf(),
        None => layout_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("export")
            .join(framework.as_str()),
    };

    match Exporter::new(framework).export(&output_dir, &doc.widgets, &doc.plugin) {
        Ok(report) => {
            println!(
                "{} Exported {} file(s) for {} → {}",
                "✓".green().bold(),
                report.files.len(),
                framework,
                report.output_dir.display()
            );
            for file in &report.files {
                let rel = file.strip_prefix(&report.output_dir).unwrap_or(file);
                println!("  {} {}", "→".dimmed(), rel.display());
            }
            Ok(true)
        }
        Err(ExportError::PartialWrite {
            written,
            failed,
            source,
        }) => {
            eprintln!(
                "{} Failed writing {}: {}",
                "✗".red().bold(),
                failed.display(),
                source
            );
            eprintln!("  {} file(s) were written and left in place", written.len());
            Ok(false)
        }
        Err(e) => Err(e).with_context(|| format!("Export to '{}' failed", output_dir.display())),
    }
}

fn cmd_schema() -> Result<bool> {
    let schema = dawmaker_model::schema_def::generate_layout_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawmaker_model::{WidgetDescriptor, WidgetKind};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn init_in(tmp: &TempDir, template: ProjectTemplate, framework: Framework) -> PathBuf {
        let dir = tmp.path().join("plugin");
        cmd_init("Grit", Some(dir.as_path()), template, framework, "Acme").unwrap();
        dir
    }

    #[test]
    fn init_rejects_parent_dir_name() {
        let result = cmd_init(
            "..",
            None,
            ProjectTemplate::AudioEffect,
            Framework::Juce,
            "Acme",
        );
        assert!(result.is_err());
    }

    #[test]
    fn init_writes_layout_and_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let dir = init_in(&tmp, ProjectTemplate::Synthesizer, Framework::Dpf);

        let (doc, _) = load_layout(&dir.join(LAYOUT_FILE)).unwrap();
        assert_eq!(doc.plugin.name, "Grit");
        assert_eq!(doc.plugin.framework, Framework::Dpf);
        assert_eq!(doc.widgets, ProjectTemplate::Synthesizer.widgets());

        let again = cmd_init(
            "Grit",
            Some(dir.as_path()),
            ProjectTemplate::AudioEffect,
            Framework::Juce,
            "Acme",
        );
        assert!(again.is_err());
    }

    #[test]
    fn check_accepts_fresh_layout() {
        let tmp = TempDir::new().unwrap();
        let dir = init_in(&tmp, ProjectTemplate::AudioEffect, Framework::Juce);
        assert!(cmd_check(&dir).unwrap());
    }

    #[test]
    fn check_reports_broken_json() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join(LAYOUT_FILE);
        std::fs::write(&file, "{ not json").unwrap();
        assert!(!cmd_check(&file).unwrap());
    }

    #[test]
    fn check_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(cmd_check(&tmp.path().join("missing.json")).is_err());
    }

    #[test]
    fn preview_lists_and_prints_files() {
        let tmp = TempDir::new().unwrap();
        let dir = init_in(&tmp, ProjectTemplate::AudioEffect, Framework::Juce);
        assert!(cmd_preview(&dir, None, None).unwrap());
        assert!(cmd_preview(&dir, Some(Framework::Elements), Some("src/main.cpp")).unwrap());
        assert!(cmd_preview(&dir, None, Some("nope.txt")).is_err());
    }

    #[test]
    fn export_writes_project_with_overrides() {
        let tmp = TempDir::new().unwrap();
        let dir = init_in(&tmp, ProjectTemplate::AudioEffect, Framework::Juce);
        let out = tmp.path().join("out");

        let ok = cmd_export(
            &dir,
            Some(out.as_path()),
            Overrides {
                framework: Some(Framework::Iplug2),
                name: Some("Tape Echo".to_string()),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert!(ok);
        assert!(out.join("config.h").exists());
        assert!(out.join("TapeEcho.cpp").exists());
    }

    #[test]
    fn export_defaults_under_layout_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = init_in(&tmp, ProjectTemplate::MidiUtility, Framework::Dpf);
        assert!(cmd_export(&dir, None, Overrides::default()).unwrap());
        assert!(dir.join("export/dpf/Makefile").exists());
    }

    #[test]
    fn export_refuses_layout_with_errors() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join(LAYOUT_FILE);
        let mut doc = ProjectTemplate::AudioEffect.layout("", "Acme", Framework::Juce);
        doc.push(WidgetDescriptor::placed(WidgetKind::Knob, "Extra", 0, 0));
        save_layout(&file, &doc).unwrap();

        let out = tmp.path().join("out");
        assert!(!cmd_export(&file, Some(out.as_path()), Overrides::default()).unwrap());
        assert!(!out.exists());
    }

    #[test]
    fn export_name_override_clears_lint_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join(LAYOUT_FILE);
        let doc = ProjectTemplate::AudioEffect.layout("", "Acme", Framework::Elements);
        save_layout(&file, &doc).unwrap();

        let out = tmp.path().join("out");
        let overrides = Overrides {
            name: Some("Fixed".to_string()),
            ..Overrides::default()
        };
        assert!(cmd_export(&file, Some(out.as_path()), overrides).unwrap());
        assert!(out.join("src/main.cpp").exists());
    }

    #[test]
    fn export_into_file_path_fails() {
        let tmp = TempDir::new().unwrap();
        let dir = init_in(&tmp, ProjectTemplate::AudioEffect, Framework::Juce);
        let blocked = tmp.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();
        assert!(cmd_export(&dir, Some(blocked.as_path()), Overrides::default()).is_err());
    }

    #[test]
    fn schema_prints() {
        assert!(cmd_schema().unwrap());
    }
}
