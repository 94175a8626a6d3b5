use std::path::PathBuf;

use axum::http::{HeaderName, HeaderValue, Request};
use clap::Parser;
use serde_json::{Map, Value};

use request_interrogator::config::loader::load_config;
use request_interrogator::observability::logging;
use request_interrogator::{AuthenticatedUser, ConnectionSecurity, InterrogatorConfig, RequestInterrogator};

#[derive(Parser)]
#[command(name = "interrogate-cli")]
#[command(about = "Print the parameters the interrogator extracts from a request", long_about = None)]
struct Cli {
    /// Request target, e.g. `/teaching-resource/foo-123?storyCode=1` or an absolute url.
    url: String,

    /// Configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request header as `name: value`; repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Cookie as `name=value`; repeatable.
    #[arg(short = 'b', long = "cookie")]
    cookies: Vec<String>,

    /// Authenticated user as a JSON object.
    #[arg(short, long)]
    user: Option<String>,

    /// Treat the request as arriving over TLS.
    #[arg(long)]
    secure: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => InterrogatorConfig::default(),
    };
    logging::init_tracing("warn");

    let interrogator = RequestInterrogator::from_config(&config)?;
    let request = build_request(&cli)?;

    interrogator.interrogate_request(&request, |params| {
        match serde_json::to_string_pretty(&params) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: failed to render parameters: {}", e),
        }
    })?;

    Ok(())
}

fn build_request(cli: &Cli) -> Result<Request<()>, Box<dyn std::error::Error>> {
    let mut builder = Request::builder().uri(cli.url.as_str());

    for raw in &cli.headers {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| format!("header '{}' is not in `name: value` form", raw))?;
        builder = builder.header(HeaderName::try_from(name.trim())?, HeaderValue::from_str(value.trim())?);
    }
    if !cli.cookies.is_empty() {
        builder = builder.header("cookie", cli.cookies.join("; "));
    }

    let mut request = builder.body(())?;

    if let Some(raw) = &cli.user {
        let fields: Map<String, Value> = serde_json::from_str(raw)?;
        request.extensions_mut().insert(AuthenticatedUser::from(fields));
    }
    if cli.secure {
        request.extensions_mut().insert(ConnectionSecurity::Secure);
    }

    Ok(request)
}
