//! `lwft`: linkweft command-line interface.
//!
//! Provides three subcommands:
//!
//! - **`decode`**: decode one resource and print it as text.
//! - **`page`**: decode one page of a collection and print its items and
//!   paging state.
//! - **`fetch`**: walk a remote collection page by page.
//!
//! `decode` and `page` read JSON from a file path or from stdin (`-`).
//! `fetch` reads its API settings from `LWFT_*` environment variables.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tracing::info;

use linkweft::{decode, DecodeError, Model, Page, RequestDescriptor, WireEnum};
use linkweft_api::{render_page, Folder, Render, User, Video};
use linkweft_client::{Client, ClientConfig, HttpTransport};

/// lwft: decode and walk Vimeo-style API resources
#[derive(Parser)]
#[command(name = "lwft", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a single resource and render it as text.
    ///
    /// Exits 0 when the payload decodes, 1 when it does not.
    ///
    /// Pass `-` as FILE to read from stdin.
    Decode {
        /// Model to decode the payload as.
        #[arg(short, long, value_enum)]
        model: ModelKind,

        /// Print the resource's connections as JSON instead of the text view.
        #[arg(long)]
        connections: bool,

        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Decode one page of a collection and render its items and next link.
    ///
    /// Accepts the `{ "data": [...], "paging": {...} }` envelope or a bare
    /// JSON array.
    ///
    /// Pass `-` as FILE to read from stdin.
    Page {
        /// Model of the collection's items.
        #[arg(short, long, value_enum)]
        model: ModelKind,

        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Walk a remote collection, following `next` links.
    ///
    /// Without PATH, walks `/me/videos` when a token is configured and
    /// `/channels/staffpicks/videos` otherwise.
    ///
    /// Examples:
    ///   lwft fetch
    ///   lwft fetch /me/folders --model folder --max-pages 2
    ///   lwft fetch /users/10/followers --model user --per-page 50
    Fetch {
        /// Collection path, e.g. `/me/videos?sort=date`.
        path: Option<String>,

        /// Model of the collection's items.
        #[arg(short, long, value_enum, default_value = "video")]
        model: ModelKind,

        /// Stop after this many pages (defaults to LWFT_MAX_PAGES).
        #[arg(
            long,
            value_name = "N",
            value_parser = RangedU64ValueParser::<usize>::new().range(1..)
        )]
        max_pages: Option<usize>,

        /// Items per page to request.
        #[arg(long, value_name = "N")]
        per_page: Option<u32>,

        /// OAuth bearer token.
        #[arg(long, env = "LWFT_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelKind {
    Folder,
    User,
    Video,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lwft=info,linkweft=info,linkweft_client=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Command::Decode {
            model,
            connections,
            file,
        } => {
            let payload = read_json(&file);
            match model {
                ModelKind::Folder => decode_one::<Folder>(&payload, connections),
                ModelKind::User => decode_one::<User>(&payload, connections),
                ModelKind::Video => decode_one::<Video>(&payload, connections),
            }
        }

        Command::Page { model, file } => {
            let payload = read_json(&file);
            match model {
                ModelKind::Folder => decode_page::<Folder>(&payload),
                ModelKind::User => decode_page::<User>(&payload),
                ModelKind::Video => decode_page::<Video>(&payload),
            }
        }

        Command::Fetch {
            path,
            model,
            max_pages,
            per_page,
            token,
        } => {
            let mut config = ClientConfig::from_env();
            if token.is_some() {
                config.access_token = token;
            }
            if let Some(n) = max_pages {
                config.max_pages = n;
            }

            let session = config.session();
            let mut first = match path {
                Some(path) => RequestDescriptor::parse(&path),
                None => session.default_videos_request(),
            };
            if let Some(n) = per_page {
                first = first.with_query("per_page", n.to_string());
            }

            let http = reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_else(|e| fatal(&format!("failed to build HTTP client: {e}")));
            let client = Client::new(HttpTransport::new(http, session));

            match model {
                ModelKind::Folder => walk::<Folder>(&client, first, config.max_pages).await,
                ModelKind::User => walk::<User>(&client, first, config.max_pages).await,
                ModelKind::Video => walk::<Video>(&client, first, config.max_pages).await,
            }
        }
    };

    process::exit(code);
}

fn decode_one<M: Model + Render>(payload: &Value, show_connections: bool) -> i32 {
    let model = match decode::<M>(payload) {
        Ok(model) => model,
        Err(e) => return report(&e),
    };

    if show_connections {
        let mut out = Map::new();
        for (key, conn) in model.connections().iter() {
            let value = serde_json::to_value(conn)
                .unwrap_or_else(|e| fatal(&format!("failed to serialize connection: {e}")));
            out.insert(key.as_wire().to_string(), value);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&Value::Object(out))
                .unwrap_or_else(|e| fatal(&format!("failed to serialize connections: {e}")))
        );
    } else {
        print!("{}", model.render());
    }
    0
}

fn decode_page<M: Model + Render>(payload: &Value) -> i32 {
    match Page::<M>::decode(payload) {
        Ok(page) => {
            print!("{}", render_page(&page));
            0
        }
        Err(e) => report(&e),
    }
}

async fn walk<M: Model + Render>(
    client: &Client<HttpTransport>,
    first: RequestDescriptor,
    max_pages: usize,
) -> i32 {
    info!("fetching {} from {first} (at most {max_pages} page(s))", M::NAME);
    let walk = client.walk::<M>(first, max_pages).await;
    info!(
        "fetched {} {} in {} page(s)",
        walk.items().len(),
        M::NAME,
        walk.pages()
    );

    for (i, item) in walk.items().iter().enumerate() {
        println!("{:>4}. {}", i + 1, item.summary());
    }
    println!(
        "{} item(s) across {} page(s)",
        walk.items().len(),
        walk.pages()
    );

    match (walk.error(), walk.next()) {
        (Some(e), next) => {
            eprintln!("lwft: stopped after {} page(s): {e}", walk.pages());
            if let Some(next) = next {
                eprintln!("lwft: resume with: {next}");
            }
            1
        }
        (None, Some(next)) => {
            println!("more: {next}");
            0
        }
        (None, None) => 0,
    }
}

fn report(e: &DecodeError) -> i32 {
    eprintln!("error: {e}");
    1
}

/// Read and parse JSON from a file, or from stdin when the path is `"-"`.
fn read_json(path: &PathBuf) -> Value {
    let text = if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path)
            .unwrap_or_else(|e| fatal(&format!("failed to read {}: {}", path.display(), e)))
    };
    serde_json::from_str(&text).unwrap_or_else(|e| fatal(&format!("input is not JSON: {}", e)))
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("lwft: {}", msg);
    process::exit(2);
}
