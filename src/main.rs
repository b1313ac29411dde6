use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use tutorials_query::config::CONFIG;
use tutorials_query::execution::{QueryRequest, QueryRunner};
use tutorials_query::setup::{self, SetupResult};
use tutorials_query::state::AppData;
use tutorials_query::logging;

const DEFAULT_QUERY: &str = "{ list { id title } }";

/// Exit status when `--fail-on-errors` is set and the response carries errors.
const EXIT_QUERY_ERRORS: u8 = 2;

/// Run one GraphQL document against the in-memory tutorial catalogue and
/// print the JSON response.
#[derive(Parser, Debug)]
#[command(name = "tutorials-query", version)]
struct Opt {
    /// Query or mutation document to execute. Falls back to `TUTORIALS_QUERY`
    #[arg(conflicts_with = "file")]
    query: Option<String>,

    /// Read the document from a file instead
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Operation to run when the document defines several
    #[arg(short, long)]
    operation: Option<String>,

    /// Variables as a JSON object
    #[arg(long)]
    variables: Option<String>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,

    /// Print the schema in SDL and exit
    #[arg(long)]
    print_schema: bool,

    /// Start with an empty store
    #[arg(long)]
    no_seed: bool,

    /// Assign sequential ids to created tutorials
    #[arg(long)]
    sequential_ids: bool,

    /// Exit with status 2 when the response contains errors
    #[arg(long)]
    fail_on_errors: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let opt = Opt::parse();
    logging::init(&CONFIG.log_filter);

    match run(opt).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(opt: Opt) -> anyhow::Result<ExitCode> {
    let mut config = CONFIG.clone();
    config.seed &= !opt.no_seed;
    config.sequential_ids |= opt.sequential_ids;
    config.pretty |= opt.pretty;

    let SetupResult {
        schema,
        registry,
        store,
    } = setup::setup_all(&config).context("schema setup failed")?;

    if opt.print_schema {
        print!("{}", registry.to_sdl());
        return Ok(ExitCode::SUCCESS);
    }

    let query = read_query(
        opt.file.as_deref(),
        opt.query,
        std::env::var("TUTORIALS_QUERY").ok(),
    )?;

    let mut request = QueryRequest::new(query);
    if let Some(name) = opt.operation {
        request = request.with_operation_name(name);
    }
    if let Some(variables) = opt.variables.as_deref() {
        request = request
            .with_variables_json(variables)
            .context("invalid --variables")?;
    }

    let runner = QueryRunner::new(schema, AppData::new(store));
    let response = runner.execute(&request).await?;
    println!("{}", response.to_json_string(config.pretty)?);

    info!(
        ok = response.is_ok(),
        tutorials = runner.context().store.len(),
        "query finished"
    );

    if opt.fail_on_errors && !response.is_ok() {
        return Ok(ExitCode::from(EXIT_QUERY_ERRORS));
    }
    Ok(ExitCode::SUCCESS)
}

/// `--file` wins over the positional document, which wins over the
/// environment.
fn read_query(
    file: Option<&Path>,
    query: Option<String>,
    from_env: Option<String>,
) -> anyhow::Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read query file {}", path.display()));
    }
    Ok(query
        .or(from_env)
        .unwrap_or_else(|| DEFAULT_QUERY.to_string()))
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Opt::command().debug_assert();
    }

    #[test]
    fn file_and_query_conflict() {
        let parsed = Opt::try_parse_from(["tutorials-query", "{ hello }", "--file", "q.graphql"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_flags() {
        let opt = Opt::try_parse_from([
            "tutorials-query",
            "--variables",
            r#"{"id":2}"#,
            "--no-seed",
            "--sequential-ids",
            "--fail-on-errors",
            "-o",
            "ById",
            "query ById($id: Int) { tutorial(id: $id) { title } }",
        ])
        .unwrap();
        assert!(opt.no_seed && opt.sequential_ids && opt.fail_on_errors);
        assert_eq!(opt.operation.as_deref(), Some("ById"));
        assert_eq!(opt.variables.as_deref(), Some(r#"{"id":2}"#));
    }

    #[test]
    fn file_is_accepted_alongside_query_from_env() {
        let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let opt = Opt::try_parse_from([
            OsStr::new("tutorials-query"),
            OsStr::new("--file"),
            manifest.as_os_str(),
        ])
        .unwrap();

        let query = read_query(
            opt.file.as_deref(),
            opt.query,
            Some("{ hello }".to_string()),
        )
        .unwrap();
        assert!(query.contains("name = \"tutorials-query\""));
    }

    #[test]
    fn query_precedence() {
        assert_eq!(
            read_query(None, Some("{ list { id } }".to_string()), Some("{ hello }".to_string()))
                .unwrap(),
            "{ list { id } }"
        );
        assert_eq!(
            read_query(None, None, Some("{ hello }".to_string())).unwrap(),
            "{ hello }"
        );
        assert_eq!(read_query(None, None, None).unwrap(), DEFAULT_QUERY);
        assert!(read_query(Some(Path::new("/nonexistent/query.graphql")), None, None).is_err());
    }
}
