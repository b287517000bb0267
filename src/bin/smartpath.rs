use clap::{Parser, Subcommand, ValueEnum};
use octofhir_smartpath::{
    EntryResolutionPolicy, HintSource, IssueLocator, NavigatorConfig, Result, SmartPathError,
    SmartPathNavigator, parse_predicate,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "smartpath")]
#[command(about = "Locate FHIR validation paths inside bundle JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct NavigatorArgs {
    /// Navigator configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Entry resolution policy (strict, prefer-explicit, fallback-to-first)
    #[arg(long)]
    policy: Option<EntryResolutionPolicy>,
    /// Structural hints (none, known)
    #[arg(long, value_enum)]
    hints: Option<HintsArg>,
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one path to a JSON Pointer
    Resolve {
        /// Path to the FHIR document (bundle or single resource)
        #[arg(short, long)]
        input: PathBuf,
        /// Semantic path, e.g. Observation.code.coding.code
        #[arg(short, long)]
        path: String,
        /// Explicit bundle entry index
        #[arg(short, long)]
        entry_index: Option<usize>,
        /// Resource type the path refers to
        #[arg(short, long)]
        resource_type: Option<String>,
        #[command(flatten)]
        navigator: NavigatorArgs,
    },
    /// Locate a JSON array of rule violations
    Locate {
        /// Path to the FHIR document (bundle or single resource)
        #[arg(short, long)]
        input: PathBuf,
        /// Path to the violations file
        #[arg(short, long)]
        violations: PathBuf,
        #[command(flatten)]
        navigator: NavigatorArgs,
    },
    /// Parse a where() predicate body and print its tree
    ParsePredicate {
        /// Predicate text, e.g. "system='http://loinc.org' and code.exists()"
        text: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HintsArg {
    None,
    Known,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Resolve {
            input,
            path,
            entry_index,
            resource_type,
            navigator,
        } => {
            let root = read_json(&input).await?;
            let smart = build_navigator(&navigator)?;
            let result = smart.try_resolve(&root, &path, entry_index, resource_type.as_deref());

            match (navigator.format, &result) {
                (OutputFormat::Json, Ok(location)) => {
                    println!("{}", serde_json::to_string_pretty(location)?);
                }
                (OutputFormat::Json, Err(failure)) => {
                    let report = serde_json::json!({ "found": false, "reason": failure.to_string() });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                (OutputFormat::Text, Ok(location)) => {
                    println!("{}", location.pointer);
                    println!("{}", location.breadcrumbs.join(" > "));
                }
                (OutputFormat::Text, Err(failure)) => {
                    println!("not found: {failure}");
                }
            }

            Ok(if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Locate {
            input,
            violations,
            navigator,
        } => {
            let root = read_json(&input).await?;
            let violations_json = tokio::fs::read_to_string(&violations).await?;
            let locator = IssueLocator::new(build_navigator(&navigator)?);
            let issues = locator.locate_json(&root, &violations_json)?;

            match navigator.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&issues)?),
                OutputFormat::Text => {
                    for issue in &issues {
                        let where_ = match (&issue.location, &issue.unresolved_reason) {
                            (Some(location), _) => location.pointer.to_string(),
                            (None, Some(reason)) => format!("<unresolved: {reason}>"),
                            (None, None) => "<unresolved>".to_string(),
                        };
                        println!(
                            "[{}] {} {}: {}",
                            issue.violation.severity,
                            issue.violation.rule_id,
                            where_,
                            issue.violation.message
                        );
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::ParsePredicate { text } => match parse_predicate(&text) {
            Some(expr) => {
                println!("{}", serde_json::to_string_pretty(&expr)?);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                println!("invalid predicate: {text}");
                Ok(ExitCode::from(1))
            }
        },
    }
}

fn build_navigator(args: &NavigatorArgs) -> Result<SmartPathNavigator> {
    let mut config = match &args.config {
        Some(path) => NavigatorConfig::from_json_file(path)?,
        None => NavigatorConfig::default(),
    };
    if let Some(policy) = args.policy {
        config = config.with_entry_policy(policy);
    }
    if let Some(hints) = args.hints {
        config = config.with_hints(match hints {
            HintsArg::None => HintSource::None,
            HintsArg::Known => HintSource::Known,
        });
    }
    tracing::debug!(?config, "navigator configuration");
    Ok(SmartPathNavigator::from_config(&config))
}

async fn read_json(path: &Path) -> Result<Value> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        SmartPathError::invalid_input(format!("cannot read {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&content)?)
}
