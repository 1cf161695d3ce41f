use anyhow::Result;
use clap::{Parser, Subcommand};
use issueq::config::{LogFormat, OutputFormat};
use issueq::{Config, IdentityNormalizer, ParsedQuery};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "issueq")]
#[command(about = "Parse issue search queries into filters and a tsquery expression")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.issueq/config.toml)
    #[arg(short, long, global = true, env = "ISSUEQ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a query (reads stdin when no query is given)
    Parse {
        /// Query words, joined with spaces
        query: Vec<String>,

        /// Output format: json, yaml or text
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Keep assignee values as typed instead of normalizing them
        #[arg(long)]
        raw_assignee: bool,
    },

    /// Print the effective configuration
    Config,
}

fn init_tracing(config: &Config) {
    let json = config.logging.format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
        ))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr)))
        .init();
}

fn render(parsed: &ParsedQuery, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(parsed)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(parsed)?,
        OutputFormat::Text => format!(
            "status:     {}\nsearch:     {}\nassignee:   {}\nlimit:      {}\nlabels:     {}\n",
            parsed.status,
            parsed.search_expression,
            parsed.assignee,
            parsed.limit,
            parsed.labels.join(", ")
        ),
    })
}

fn run_parse(
    config: &Config,
    query: Vec<String>,
    raw_assignee: bool,
) -> issueq::Result<ParsedQuery> {
    if query.is_empty() {
        tracing::debug!("Reading query from stdin");
        let stdin = io::stdin().lock();
        return if raw_assignee {
            issueq::Parser::new(IdentityNormalizer)
                .with_config(&config.parser)
                .parse(stdin)
        } else {
            issueq::Parser::default()
                .with_config(&config.parser)
                .parse(stdin)
        };
    }

    let input = query.join(" ");
    Ok(if raw_assignee {
        issueq::Parser::new(IdentityNormalizer).parse_str(&input)
    } else {
        issueq::Parser::default().parse_str(&input)
    })
}

/// `load_from` expands `~` itself.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config);

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Parse {
            query,
            format,
            raw_assignee,
        } => {
            let parsed = run_parse(&config, query, raw_assignee)?;
            let format = format.unwrap_or(config.output.format);
            stdout.write_all(render(&parsed, format)?.as_bytes())?;
        }
        Commands::Config => {
            stdout.write_all(toml::to_string_pretty(&config)?.as_bytes())?;
        }
    }

    Ok(())
}
