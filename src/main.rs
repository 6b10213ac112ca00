use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use holdings_query::config::{get_config, Config, ConfigFile, LogFormat, CONFIG_FILE_NAME};
use holdings_query::models::{PaginationInfo, ResourceKind, Translation};
use holdings_query::query::{fields, mapping, QueryError, Translator};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Holdings Query - Translate CQL queries into knowledge-base vendor queries
#[derive(Parser, Debug)]
#[command(name = "holdings-query")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Translate CQL queries into knowledge-base vendor queries", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// Resource kind selector
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Title,
    Package,
}

impl From<Kind> for ResourceKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Title => ResourceKind::Title,
            Kind::Package => ResourceKind::Package,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a CQL query into vendor query strings
    #[command(alias = "t")]
    Translate {
        /// CQL query
        query: String,

        /// Resource kind to search
        #[arg(long, short, value_enum, default_value_t = Kind::Title)]
        kind: Kind,

        /// Index of the first record to return
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Number of records to return (defaults to paging.default_limit)
        #[arg(long, short)]
        limit: Option<usize>,

        /// Largest vendor page to request (defaults to paging.max_page_size)
        #[arg(long)]
        max_page_size: Option<usize>,
    },

    /// Show the vendor pages covering a client window
    #[command(alias = "p")]
    Paginate {
        /// Index of the first record to return
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Number of records to return
        #[arg(long, short)]
        limit: usize,

        /// Largest vendor page to request (defaults to paging.max_page_size)
        #[arg(long)]
        max_page_size: Option<usize>,
    },

    /// List the supported search fields and code tables
    Vocab {
        /// Only show one resource kind
        #[arg(long, short, value_enum)]
        kind: Option<Kind>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write the file (defaults to the user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Holdings Query - Environment Variables");
    println!();
    println!("Paging:");
    println!("  HOLDINGS_QUERY_PAGING__MAX_PAGE_SIZE   Largest vendor page to request, 1-100 (default: 100)");
    println!("  HOLDINGS_QUERY_PAGING__DEFAULT_LIMIT   Records returned when no limit is given (default: 25)");
    println!("  HOLDINGS_QUERY_PAGING__MAX_LIMIT       Largest limit a caller may request (default: 1000)");
    println!();
    println!("Logging:");
    println!("  HOLDINGS_QUERY_LOGGING__LEVEL          Log level: error, warn, info, debug, trace (default: warn)");
    println!("  HOLDINGS_QUERY_LOGGING__FORMAT         Log format: pretty or json (default: pretty)");
    println!("  RUST_LOG                               Overrides the log filter entirely");
    println!();
    println!("Example:");
    println!("  export HOLDINGS_QUERY_PAGING__MAX_PAGE_SIZE=\"50\"");
    std::process::exit(0);
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("holdings_query={}", level)),
    );

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    let config = get_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&cli, &config);

    let format = cli.output.resolve();

    match cli.command {
        Some(Commands::Translate {
            query,
            kind,
            offset,
            limit,
            max_page_size,
        }) => {
            let translator = match max_page_size {
                Some(size) => Translator::new().with_max_page_size(size),
                None => Translator::from_config(&config.paging),
            };
            let limit = limit.unwrap_or(config.paging.default_limit);

            match translator.translate(&query, offset, limit, kind.into()) {
                Ok(translation) => output_translation(&translation, format),
                Err(err) => {
                    if format == OutputFormat::Json {
                        output_error(&err);
                    }
                    return Err(err.into());
                }
            }
        }

        Some(Commands::Paginate {
            offset,
            limit,
            max_page_size,
        }) => {
            let translator = Translator::from_config(&config.paging)
                .with_max_page_size(max_page_size.unwrap_or(config.paging.max_page_size));

            match translator.paginate(offset, limit) {
                Ok(info) => output_pagination(&info, format),
                Err(err) => {
                    if format == OutputFormat::Json {
                        output_error(&err);
                    }
                    return Err(err.into());
                }
            }
        }

        Some(Commands::Vocab { kind }) => {
            let kinds: Vec<ResourceKind> = match kind {
                Some(kind) => vec![kind.into()],
                None => vec![ResourceKind::Title, ResourceKind::Package],
            };
            output_vocab(&kinds, format);
        }

        Some(Commands::InitConfig { path, force }) => {
            let path = match path {
                Some(path) => path,
                None => dirs::config_dir()
                    .map(|dir| dir.join("holdings-query").join(CONFIG_FILE_NAME))
                    .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
            };
            if path.exists() && !force {
                let existing = ConfigFile::load(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
                    .into_config();
                existing
                    .validate()
                    .with_context(|| format!("Invalid configuration in {}", path.display()))?;
                if !cli.quiet {
                    println!(
                        "{} already exists and is valid (use --force to overwrite)",
                        path.display()
                    );
                }
            } else {
                ConfigFile::write_default(&path, force)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !cli.quiet {
                    println!("Wrote default configuration to {}", path.display());
                }
            }
        }

        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "holdings-query", &mut std::io::stdout());
        }

        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

fn output_translation(translation: &Translation, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(translation),
        OutputFormat::Plain => match translation {
            Translation::IdLookup { id } => println!("id {}", id),
            Translation::Search { queries, .. } => {
                for query in queries {
                    println!("{}", query);
                }
            }
        },
        OutputFormat::Table | OutputFormat::Auto => match translation {
            Translation::IdLookup { id } => {
                println!("Direct lookup of id {}", id);
            }
            Translation::Search { queries, windowing } => {
                use comfy_table::{Attribute, Cell, Table};
                let mut table = Table::new();
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.set_header(vec!["#", "Vendor query"]);

                for (i, query) in queries.iter().enumerate() {
                    table.add_row(vec![
                        Cell::new(i + 1).add_attribute(Attribute::Bold),
                        Cell::new(query),
                    ]);
                }
                println!("{table}");
                println!(
                    "Return {} record(s) starting at index {} of the combined results",
                    windowing.limit, windowing.first_object_index
                );
            }
        },
    }
}

fn output_pagination(info: &PaginationInfo, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(info),
        OutputFormat::Plain => {
            for page in &info.pages {
                println!("page={} size={}", page.page_number, page.page_size);
            }
            println!(
                "first_object_index={} limit={}",
                info.first_object_index, info.limit
            );
        }
        OutputFormat::Table | OutputFormat::Auto => {
            use comfy_table::{Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Page", "Page size", "Records"]);

            for page in &info.pages {
                let first = (page.page_number - 1).saturating_mul(page.page_size);
                table.add_row(vec![
                    Cell::new(page.page_number),
                    Cell::new(page.page_size),
                    Cell::new(format!("{}..{}", first, first.saturating_add(page.page_size))),
                ]);
            }
            println!("{table}");
            println!(
                "Slice [{}, {}) of the combined results",
                info.first_object_index,
                info.first_object_index.saturating_add(info.limit)
            );
        }
    }
}

fn output_vocab(kinds: &[ResourceKind], format: OutputFormat) {
    let tables = [mapping::resource_types(), mapping::content_types()];

    match format {
        OutputFormat::Json => {
            let fields: serde_json::Map<String, serde_json::Value> = kinds
                .iter()
                .map(|kind| (kind.to_string(), serde_json::json!(fields::allowed_fields(*kind))))
                .collect();
            let codes: serde_json::Map<String, serde_json::Value> = tables
                .iter()
                .map(|table| {
                    let pairs: serde_json::Map<String, serde_json::Value> = table
                        .entries()
                        .iter()
                        .map(|(codex, vendor)| (codex.to_string(), serde_json::json!(vendor)))
                        .collect();
                    (table.name().to_string(), serde_json::Value::Object(pairs))
                })
                .collect();
            let canonical: serde_json::Map<String, serde_json::Value> = tables
                .iter()
                .map(|table| {
                    let reverse: serde_json::Map<String, serde_json::Value> = table
                        .entries()
                        .iter()
                        .filter_map(|(_, vendor)| {
                            table
                                .codex_value(vendor)
                                .map(|codex| (vendor.to_string(), serde_json::json!(codex)))
                        })
                        .collect();
                    (table.name().to_string(), serde_json::Value::Object(reverse))
                })
                .collect();
            print_json(&serde_json::json!({
                "fields": fields,
                "codes": codes,
                "canonical": canonical,
            }));
        }
        OutputFormat::Plain => {
            for kind in kinds {
                println!("{}: {}", kind, fields::allowed_fields(*kind).join(", "));
            }
            for table in tables {
                for (codex, vendor) in table.entries() {
                    match table.codex_value(vendor) {
                        Some(canonical) if canonical != *codex => println!(
                            "{} {} -> {} (alias of {})",
                            table.name(),
                            codex,
                            vendor,
                            canonical
                        ),
                        _ => println!("{} {} -> {}", table.name(), codex, vendor),
                    }
                }
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Kind", "Fields", "Sort field"]);
            for kind in kinds {
                table.add_row(vec![
                    Cell::new(kind).add_attribute(Attribute::Bold),
                    Cell::new(fields::allowed_fields(*kind).join(", ")),
                    Cell::new(fields::name_field(*kind)),
                ]);
            }
            println!("{table}");

            let mut codes = Table::new();
            codes.load_preset(comfy_table::presets::UTF8_FULL);
            codes.set_header(vec!["Field", "Codex value", "Vendor code", "Reported as"]);
            for code_table in tables {
                for (codex, vendor) in code_table.entries() {
                    let canonical = code_table.codex_value(vendor).unwrap_or(*codex);
                    codes.add_row(vec![code_table.name(), *codex, *vendor, canonical]);
                }
            }
            println!("{codes}");
        }
    }
}

fn output_error(err: &QueryError) {
    print_json(&serde_json::json!({
        "error": err.kind(),
        "message": err.to_string(),
    }));
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialize output: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["holdings-query"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["holdings-query", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["holdings-query", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["holdings-query", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);

        let cli = Cli::parse_from(["holdings-query", "--output", "plain"]);
        assert_eq!(cli.output, OutputFormat::Plain);
        assert_eq!(cli.output.resolve(), OutputFormat::Plain);
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::parse_from(["holdings-query", "--config", "/path/to/holdings-query.toml"]);
        assert_eq!(
            cli.config,
            Some(PathBuf::from("/path/to/holdings-query.toml"))
        );
    }

    #[test]
    fn test_cli_translate_command() {
        let cli = Cli::parse_from(["holdings-query", "translate", "title = bridges"]);
        match cli.command {
            Some(Commands::Translate {
                query,
                kind,
                offset,
                limit,
                max_page_size,
            }) => {
                assert_eq!(query, "title = bridges");
                assert_eq!(kind, Kind::Title);
                assert_eq!(offset, 0);
                assert_eq!(limit, None);
                assert_eq!(max_page_size, None);
            }
            _ => panic!("Expected Translate command"),
        }
    }

    #[test]
    fn test_cli_translate_with_options() {
        let cli = Cli::parse_from([
            "holdings-query",
            "t",
            "name = ebsco",
            "--kind",
            "package",
            "--offset",
            "31",
            "-l",
            "15",
            "-o",
            "json",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Some(Commands::Translate {
                kind,
                offset,
                limit,
                ..
            }) => {
                assert_eq!(ResourceKind::from(kind), ResourceKind::Package);
                assert_eq!(offset, 31);
                assert_eq!(limit, Some(15));
            }
            _ => panic!("Expected Translate command"),
        }
    }

    #[test]
    fn test_cli_paginate_command() {
        let cli = Cli::parse_from(["holdings-query", "paginate", "--offset", "150", "--limit", "250"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Paginate {
                offset: 150,
                limit: 250,
                max_page_size: None
            })
        ));
    }

    #[test]
    fn test_cli_init_config_command() {
        let cli = Cli::parse_from(["holdings-query", "init-config", "./hq.toml", "--force"]);
        match cli.command {
            Some(Commands::InitConfig { path, force }) => {
                assert_eq!(path, Some(PathBuf::from("./hq.toml")));
                assert!(force);
            }
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_cli_completions_command() {
        let cli = Cli::parse_from(["holdings-query", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Completions {
                shell: clap_complete::Shell::Bash
            })
        ));
    }
}
