//! sectconf CLI - Command-line interface for sectconf configuration files
//!
//! Usage:
//!   sectconf get server.conf mysql_user --section production
//!   sectconf check server.conf other.conf
//!   sectconf dump server.conf --format json

use clap::{Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use sectconf_core::{Config, ConfigOptions, Document, SearchPath, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// sectconf - Sectioned configuration files with here-doc values
#[derive(Parser)]
#[command(name = "sectconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get the value of an option
    Get {
        /// Configuration file, searched for upwards from the working directory
        file: PathBuf,

        /// Option name, bare (e.g., user) or qualified (e.g., mysql.user)
        key: String,

        /// Section to search before global; repeat to search several in order.
        /// Defaults to the directories between the file and the working directory.
        #[arg(short, long = "section")]
        sections: Vec<String>,

        /// Value printed if the option is not defined
        #[arg(short, long)]
        default: Option<String>,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check that configuration files parse
    Check {
        /// Configuration file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print every option of a configuration file
    Dump {
        /// Configuration file to dump
        file: PathBuf,

        /// Only print options of this section
        #[arg(short, long)]
        section: Option<String>,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            file,
            key,
            sections,
            default,
            format,
        } => cmd_get(file, &key, sections, default, &format),

        Commands::Check { files } => cmd_check(files),

        Commands::Dump {
            file,
            section,
            format,
        } => cmd_dump(file, section.as_deref(), &format),
    }
}

fn options_for(sections: &[String]) -> ConfigOptions {
    let options = ConfigOptions::default();
    if sections.is_empty() {
        options
    } else {
        options.with_search_path(SearchPath::from_sections(sections))
    }
}

fn load_config(file: &Path, options: &ConfigOptions) -> Result<Config, String> {
    Config::load(file, options).map_err(|e| format!("Failed to load {}: {}", file.display(), e))
}

fn format_value(value: &Value, format: &str) -> Result<String, String> {
    match format {
        "json" => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| e.to_string()),
        _ => Ok(value.to_string()),
    }
}

fn format_document(
    document: &Document,
    section: Option<&str>,
    format: &str,
) -> Result<String, String> {
    let entries: IndexMap<&str, &Value> = match section {
        Some(name) => document.section(name).collect(),
        None => document.iter().collect(),
    };

    match format {
        "json" => serde_json::to_string_pretty(&entries).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(&entries)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| e.to_string()),
        _ => Ok(entries
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) if s.contains('\n') => {
                    let terminator = block_terminator(s);
                    format!("{} = <<<{}\n{}\n{}", key, terminator, s, terminator)
                }
                Value::String(s) => format!("{} = {}", key, quote(s)),
                other => format!("{} = {}", key, other),
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Quote a string so the parser reads it back unchanged
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// A here-doc terminator that does not start any line of `body`
fn block_terminator(body: &str) -> String {
    let lines = format!("\n{}", body);
    let mut terminator = "END".to_string();
    let mut n = 0;
    while lines.contains(&format!("\n{}", terminator)) {
        n += 1;
        terminator = format!("END{}", n);
    }
    terminator
}

fn cmd_get(
    file: PathBuf,
    key: &str,
    sections: Vec<String>,
    default: Option<String>,
    format: &str,
) -> ExitCode {
    let config = match load_config(&file, &options_for(&sections)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let value = match (config.get(key), default) {
        (Some(value), _) => value.clone(),
        (None, Some(default)) => Value::String(default),
        (None, None) => {
            eprintln!("{}: Option '{}' not defined", "Error".red(), key);
            return ExitCode::from(1);
        }
    };

    match format_value(&value, format) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn cmd_check(files: Vec<PathBuf>) -> ExitCode {
    let mut all_valid = true;

    for file in files {
        let content = match std::fs::read_to_string(&file) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
                continue;
            }
        };

        match Document::parse(&content) {
            Ok(doc) => {
                println!(
                    "{} {}: {} options in {} sections",
                    "✓".green(),
                    file.display(),
                    doc.len(),
                    doc.sections().len()
                );
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn cmd_dump(file: PathBuf, section: Option<&str>, format: &str) -> ExitCode {
    let config = match load_config(&file, &ConfigOptions::default()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match format_document(config.document(), section, format) {
        Ok(content) => {
            if !content.is_empty() {
                println!("{}", content);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}
