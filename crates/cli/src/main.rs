//! `json2video-node` CLI entry-point.
//!
//! Available sub-commands:
//! - `run`    — execute the node against a parameter file.
//! - `build`  — print the request body for one item without sending it.
//! - `status` — query the rendering status of a job.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::ReqwestRequester;
use engine::params::Parameters;
use engine::{build_request_body, is_advanced_mode, Json2VideoNode, NodeConfig, Operation};
use nodes::{ExecutableNode, ExecutionContext, JsonParameters};

#[derive(Parser)]
#[command(
    name = "json2video-node",
    about = "Build and send json2video movie requests",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ApiArgs {
    /// json2video API key.
    #[arg(long, env = "JSON2VIDEO_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "JSON2VIDEO_BASE_URL", default_value = "https://api.json2video.com/v2")]
    base_url: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Execute the node. The parameter file holds one object per input item
    /// (a single object means one item).
    Run {
        #[arg(long)]
        params: PathBuf,

        /// Record failed items as error rows instead of stopping.
        #[arg(long)]
        continue_on_fail: bool,

        #[command(flatten)]
        api: ApiArgs,
    },
    /// Print the request body an item would send.
    Build {
        #[arg(long)]
        params: PathBuf,

        #[arg(long, default_value_t = 0)]
        item: usize,
    },
    /// Fetch the status of a rendering job.
    Status {
        job_id: String,

        #[command(flatten)]
        api: ApiArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            params,
            continue_on_fail,
            api,
        } => {
            let parameters = load_parameters(&params)?;
            let output = execute(parameters, &api, continue_on_fail).await?;
            print_json(&output)
        }
        Command::Build { params, item } => {
            let parameters = load_parameters(&params)?;
            if item >= parameters.len() {
                bail!("item {item} out of range: {} has {} item(s)", params.display(), parameters.len());
            }

            let view = Parameters::new(&parameters, item);
            let operation: Operation = view
                .string("operation")
                .unwrap_or_else(|| Operation::CreateMovie.to_string())
                .parse()?;
            let advanced = is_advanced_mode(&view, operation);
            info!(%operation, item, advanced, "building request body");

            let body = build_request_body(&parameters, operation, item, advanced)?;
            print_json(&body.to_value()?)
        }
        Command::Status { job_id, api } => {
            let parameters = JsonParameters::single(json!({
                "operation": "checkStatus",
                "jobId": job_id,
            }));
            let output = execute(parameters, &api, false).await?;
            print_json(&output)
        }
    }
}

fn load_parameters(path: &Path) -> Result<JsonParameters> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read parameter file {}", path.display()))?;
    let document: Value = serde_json::from_str(&content)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;
    Ok(JsonParameters::from_value(document))
}

async fn execute(parameters: JsonParameters, api: &ApiArgs, continue_on_fail: bool) -> Result<Value> {
    let item_count = parameters.len();
    let http = ReqwestRequester::new(Duration::from_secs(api.timeout_secs))?;
    let config = NodeConfig::with_base_url(api.base_url.clone());

    let ctx = ExecutionContext::new("json2video", Arc::new(parameters))
        .with_credentials(config.credentials_name.clone(), json!({ "apiKey": api.api_key }))
        .with_continue_on_fail(continue_on_fail);
    info!(execution_id = %ctx.execution_id, items = item_count, "executing node");

    let node = Json2VideoNode::new(Arc::new(http), config);
    let output = node.execute(vec![Value::Null; item_count], &ctx).await?;
    Ok(serde_json::to_value(output)?)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
