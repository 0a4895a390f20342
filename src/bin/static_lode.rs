use std::process::ExitCode;

use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use static_lode::app::{DocumentationFetcher, ProduceReport, ProgressSink};
use static_lode::cli::Cli;
use static_lode::config::ConfigLoader;
use static_lode::error::LodeError;
use static_lode::lode::LodeHttpClient;
use static_lode::output::{ConsoleProgress, JsonOutput, OutputMode};

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<LodeError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &LodeError) -> u8 {
    match error {
        LodeError::InvalidPrefixUrl(_)
        | LodeError::InvalidAcronym(_)
        | LodeError::ConfigRead(_)
        | LodeError::ConfigParse(_)
        | LodeError::InvalidReplaceRule(_)
        | LodeError::InvalidPattern { .. } => 2,
        LodeError::LodeHttp(_) => 3,
        LodeError::Filesystem(_) => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_normalized();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Console
    };

    let ontologies = ConfigLoader::resolve(cli.prefix_url.as_deref(), cli.conf_file.as_deref())?;
    if ontologies.is_empty() {
        tracing::warn!("no ontologies given (use --prefix-url or --conf-file)");
    }

    let config = cli.fetch_config();
    let client = LodeHttpClient::new()?;
    let fetcher = DocumentationFetcher::new(client, &config, ontologies)?;

    let sink: &dyn ProgressSink = match output_mode {
        OutputMode::Console => &ConsoleProgress,
        OutputMode::Json => &JsonOutput,
    };
    let report = fetcher.produce(sink)?;

    match output_mode {
        OutputMode::Console => print_summary(&report),
        OutputMode::Json => JsonOutput::print_report(&report).into_diagnostic()?,
    }
    Ok(())
}

fn print_summary(report: &ProduceReport) {
    println!("Documentation pages written: {}", report.documents.len());
    for document in &report.documents {
        println!("  {} -> {}", document.acronym, document.path);
    }
}
