use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rental_client::api::{ApiClient, ApiResponse, Attachment};
use rental_client::core::config::{self, ResolvedConfig};
use rental_client::core::session::{FileSessionStore, SessionStore};
use rental_client::routing::{Decision, NavigationGuard, RouteTable};
use rental_client::services::{PropertyService, PropertyUpdate, RentRequestService};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "rental-client", about = "Command-line client for the rental platform")]
struct Args {
    /// Backend base URL (overrides config and RENTAL_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a session token
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the session token
    Logout,
    /// Show whether a session token is stored
    Status,
    /// List registered routes and redirects
    Routes,
    /// Show what the navigation guard does with a path
    Navigate { path: String },
    /// Property listings
    #[command(subcommand)]
    Properties(PropertyCommand),
    /// Rent requests
    #[command(subcommand)]
    Requests(RequestCommand),
}

#[derive(Subcommand)]
enum PropertyCommand {
    List,
    Mine,
    Get { id: String },
    SetStatus { id: String, status: String },
    Delete { id: String },
    /// Full update from a JSON file, optionally with image attachments
    Update {
        id: String,
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        attach: Vec<PathBuf>,
    },
}

#[derive(Subcommand)]
enum RequestCommand {
    List,
    Create {
        #[arg(long)]
        data: PathBuf,
    },
    SetStatus { id: String, status: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(&file_config, args.base_url.as_deref());

    // Initialize file logger - writes to rental-client.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("rental-client.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("rental-client starting against {}", resolved.base_url);

    match run(args.command, &resolved).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Command failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &ResolvedConfig) -> Result<(), Box<dyn Error>> {
    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(&config.token_file));

    match command {
        Command::Login { token } => {
            session.set_token(&token)?;
            println!("signed in");
        }
        Command::Logout => {
            session.clear_token()?;
            println!("signed out");
        }
        Command::Status => {
            if session.is_authenticated() {
                println!("authenticated");
            } else {
                println!("not authenticated");
            }
        }
        Command::Routes => {
            let table = RouteTable::application()?;
            for redirect in table.redirects() {
                println!("{:<34} -> {}", redirect.from, redirect.to);
            }
            for route in table.routes() {
                println!(
                    "{:<34} {:<16} auth={:<5} guest={:<5} layout={}",
                    route.pattern.as_str(),
                    route.view_id,
                    route.meta.requires_auth,
                    route.meta.requires_guest,
                    route.meta.layout.label()
                );
            }
        }
        Command::Navigate { path } => {
            let guard = NavigationGuard::new(Arc::new(RouteTable::application()?), session);
            match guard.check(&path) {
                Decision::Allow => println!("allow {path}"),
                Decision::Redirect(to) => println!("redirect {path} -> {to}"),
            }
        }
        Command::Properties(cmd) => {
            let service = PropertyService::new(ApiClient::from_config(config, session)?);
            let result = match cmd {
                PropertyCommand::List => service.list_all().await,
                PropertyCommand::Mine => service.list_mine().await,
                PropertyCommand::Get { id } => service.get(id).await,
                PropertyCommand::SetStatus { id, status } => service.update_status(id, &status).await,
                PropertyCommand::Delete { id } => service.delete(id).await,
                PropertyCommand::Update { id, data, attach } => {
                    let update: PropertyUpdate = serde_json::from_str(&std::fs::read_to_string(&data)?)?;
                    let attachments = attach
                        .iter()
                        .map(|p| read_attachment(p))
                        .collect::<std::io::Result<Vec<_>>>()?;
                    service.update(id, &update, &attachments).await
                }
            };
            print_response(result)?;
        }
        Command::Requests(cmd) => {
            let service = RentRequestService::new(ApiClient::from_config(config, session)?);
            let result = match cmd {
                RequestCommand::List => service.list_mine().await,
                RequestCommand::Create { data } => {
                    let body: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&data)?)?;
                    service.create(&body).await
                }
                RequestCommand::SetStatus { id, status } => service.update_status(id, &status).await,
            };
            print_response(result)?;
        }
    }
    Ok(())
}

fn print_response(result: ApiResponse) -> Result<(), Box<dyn Error>> {
    let value = result?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn read_attachment(path: &Path) -> std::io::Result<Attachment> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    Ok(Attachment {
        file_name,
        content_type: content_type.essence_str().to_string(),
        bytes,
    })
}
