use std::io::{Read, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wallet_attached_storage::signing::{AuthorizationHeaderBuilder, SignatureOptions};
use wallet_attached_storage::{
    DEFAULT_CONTENT_TYPE, Ed25519Signer, RequestOptions, Secp256k1Signer, Signer, StorageClient,
    StorageResponse,
};

#[derive(Debug, Clone, ValueEnum)]
enum SigningAlgorithm {
    Ed25519,
    Secp256k1,
}

#[derive(Parser)]
#[clap(name = "was", about = "Wallet Attached Storage client")]
struct Args {
    #[clap(long, env = "WAS_URL", default_value = "http://localhost:8080")]
    url: String,
    /// Requests are sent unsigned when no seed is configured.
    #[clap(long, env = "WAS_SIGNING_KEY_SEED", hide_env_values = true)]
    signing_key_seed: Option<String>,
    #[clap(long, env = "WAS_SIGNING_ALGORITHM", default_value = "ed25519")]
    signing_algorithm: SigningAlgorithm,
    /// Ignored when RUST_LOG is set.
    #[clap(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the signer's key id.
    Whoami,
    /// Print an Authorization header value.
    Sign {
        #[clap(long, default_value = "GET")]
        method: String,
        #[clap(long)]
        path: String,
        #[clap(long)]
        created: Option<u64>,
        #[clap(long)]
        expires: Option<u64>,
    },
    #[clap(subcommand)]
    Space(SpaceCommand),
    #[clap(subcommand)]
    Resource(ResourceCommand),
}

#[derive(Subcommand)]
enum SpaceCommand {
    /// Provision a new space controlled by the signer.
    Create {
        /// Existing urn:uuid to provision instead of a random one.
        #[clap(long)]
        id: Option<String>,
    },
    Get {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum ResourceCommand {
    Get {
        space: String,
        path: String,
    },
    /// Upload stdin, or `--data`.
    Put {
        space: String,
        path: String,
        #[clap(long)]
        data: Option<String>,
        #[clap(long, default_value = DEFAULT_CONTENT_TYPE)]
        content_type: String,
    },
    Post {
        space: String,
        path: String,
        #[clap(long)]
        data: Option<String>,
        #[clap(long, default_value = DEFAULT_CONTENT_TYPE)]
        content_type: String,
    },
    Delete {
        space: String,
        path: String,
    },
}

/// Identity for the signer, including the controller DID a space is provisioned with.
struct Identity {
    signer: Arc<dyn Signer>,
    controller: String,
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn identity(args: &Args) -> Result<Option<Identity>> {
    let Some(seed) = args.signing_key_seed.as_deref() else {
        return Ok(None);
    };
    let identity = match args.signing_algorithm {
        SigningAlgorithm::Ed25519 => {
            let signer = Ed25519Signer::from_seed(seed);
            let controller = signer.controller().to_string();
            Identity {
                signer: Arc::new(signer),
                controller,
            }
        }
        SigningAlgorithm::Secp256k1 => {
            let signer = Secp256k1Signer::from_seed(seed)
                .context("failed to create secp256k1 signer")?;
            let controller = signer.controller().to_string();
            Identity {
                signer: Arc::new(signer),
                controller,
            }
        }
    };
    info!(key_id = identity.signer.id(), "loaded signer");
    Ok(Some(identity))
}

fn body(data: Option<String>) -> Result<Vec<u8>> {
    match data {
        Some(data) => Ok(data.into_bytes()),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading body from stdin")?;
            Ok(buf)
        }
    }
}

fn report(response: StorageResponse) -> Result<()> {
    eprintln!("{}", response.status());
    std::io::stdout()
        .write_all(response.content())
        .context("writing response body")?;
    if !response.ok() {
        bail!("server responded with status {}", response.status());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let identity = identity(&args)?;
    let signer = identity.as_ref().map(|identity| identity.signer.clone());
    let client = StorageClient::new(args.url.clone());

    match args.command {
        Command::Whoami => {
            let identity = identity.context("no signing key configured")?;
            println!("{}", identity.signer.id());
        }
        Command::Sign {
            method,
            path,
            created,
            expires,
        } => {
            let signer = signer.context("no signing key configured")?;
            let header = AuthorizationHeaderBuilder::new().build(
                signer.as_ref(),
                &method,
                &path,
                &SignatureOptions {
                    created,
                    expires,
                    include_headers: None,
                },
            )?;
            println!("{header}");
        }
        Command::Space(SpaceCommand::Create { id }) => {
            let identity = identity.context("creating a space needs a signing key")?;
            let space = client.space(id.as_deref(), Some(identity.signer.clone()))?;
            let document = serde_json::json!({
                "id": space.id().as_str(),
                "controller": identity.controller,
            });
            let response = space
                .put(
                    serde_json::to_vec(&document)?,
                    "application/json",
                    RequestOptions::new(),
                )
                .await?;
            println!("{}", space.id());
            report(response)?;
        }
        Command::Space(SpaceCommand::Get { id }) => {
            let space = client.space(Some(&id), signer)?;
            report(space.get(RequestOptions::new()).await?)?;
        }
        Command::Space(SpaceCommand::Delete { id }) => {
            let space = client.space(Some(&id), signer)?;
            report(space.delete(RequestOptions::new()).await?)?;
        }
        Command::Resource(ResourceCommand::Get { space, path }) => {
            let resource = client.space(Some(&space), signer)?.resource(Some(&path), None);
            report(resource.get(RequestOptions::new()).await?)?;
        }
        Command::Resource(ResourceCommand::Put {
            space,
            path,
            data,
            content_type,
        }) => {
            let resource = client.space(Some(&space), signer)?.resource(Some(&path), None);
            report(resource.put(body(data)?, &content_type, RequestOptions::new()).await?)?;
        }
        Command::Resource(ResourceCommand::Post {
            space,
            path,
            data,
            content_type,
        }) => {
            let resource = client.space(Some(&space), signer)?.resource(Some(&path), None);
            report(resource.post(body(data)?, &content_type, RequestOptions::new()).await?)?;
        }
        Command::Resource(ResourceCommand::Delete { space, path }) => {
            let resource = client.space(Some(&space), signer)?.resource(Some(&path), None);
            report(resource.delete(RequestOptions::new()).await?)?;
        }
    }

    Ok(())
}
