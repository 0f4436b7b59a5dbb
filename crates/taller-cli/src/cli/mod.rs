//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use taller_core::{interrupt, logging};

mod commands;

use commands::App;

#[derive(Parser)]
#[command(name = "taller")]
#[command(version)]
#[command(about = "Manage workshops, their clients and orders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print results as JSON ({"success": ..., "data"|"error": ...})
    #[arg(long, global = true)]
    json: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long, env = "TALLER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long, env = "TALLER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Password confirmation (read from stdin when omitted)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show who is signed in
    Status,

    /// Manage workshops
    Talleres {
        #[command(subcommand)]
        command: TallerCommands,
    },

    /// Manage a workshop's clients
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },

    /// Manage a client's order lines
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct TallerFields {
    /// Workshop name
    #[arg(long)]
    nombre: String,
    /// Icon image URI
    #[arg(long)]
    icono: Option<String>,
}

#[derive(clap::Subcommand)]
enum TallerCommands {
    /// List your workshops
    List,
    /// Add a workshop
    Create {
        #[command(flatten)]
        fields: TallerFields,
    },
    /// Replace a workshop's fields
    Update {
        #[arg(value_name = "ID")]
        id: String,
        #[command(flatten)]
        fields: TallerFields,
    },
    /// Delete a workshop
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ClientFields {
    /// Client name
    #[arg(long)]
    nombre: String,
    #[arg(long)]
    telefono: Option<String>,
    /// Outstanding debt (0 for new clients; left unchanged on update when omitted)
    #[arg(long)]
    deuda: Option<String>,
}

#[derive(clap::Subcommand)]
enum ClientCommands {
    /// List a workshop's clients
    List {
        #[arg(long, value_name = "TALLER_ID")]
        taller: String,
    },
    /// Add a client to a workshop
    Create {
        #[arg(long, value_name = "TALLER_ID")]
        taller: String,
        #[command(flatten)]
        fields: ClientFields,
    },
    /// Update a client's fields
    Update {
        #[arg(value_name = "ID")]
        id: String,
        /// Move the client to another workshop
        #[arg(long, value_name = "TALLER_ID")]
        taller: Option<String>,
        #[command(flatten)]
        fields: ClientFields,
    },
    /// Delete a client
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct OrderFields {
    /// Product name
    #[arg(long)]
    nombre: String,
    #[arg(long)]
    color: String,
    /// Size
    #[arg(long)]
    talle: String,
    /// Quantity
    #[arg(long)]
    cantidad: String,
}

#[derive(clap::Subcommand)]
enum OrderCommands {
    /// List a client's order lines
    List {
        #[arg(long, value_name = "CLIENT_ID")]
        client: String,
    },
    /// Add an order line
    Create {
        #[arg(long, value_name = "CLIENT_ID")]
        client: Option<String>,
        #[command(flatten)]
        fields: OrderFields,
    },
    /// Replace an order line's fields
    Update {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(long, value_name = "CLIENT_ID")]
        client: Option<String>,
        #[command(flatten)]
        fields: OrderFields,
    },
    /// Delete an order line
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print a fresh config generated from defaults
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init();
    interrupt::init()?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, json } = cli;

    match command {
        Commands::Login { email, password } => {
            commands::auth::login(&mut App::connect(json)?, email, password).await
        }
        Commands::Signup {
            nombre,
            email,
            password,
            confirm,
        } => {
            let mut app = App::connect(json)?;
            commands::auth::signup(&mut app, nombre, email, password, confirm).await
        }
        Commands::Logout => commands::auth::logout(&mut App::connect(json)?),
        Commands::Status => commands::auth::status(&App::connect(json)?),

        Commands::Talleres { command } => {
            let mut app = App::connect(json)?;
            match command {
                TallerCommands::List => commands::talleres::list(&mut app).await,
                TallerCommands::Create { fields } => {
                    commands::talleres::create(&mut app, fields).await
                }
                TallerCommands::Update { id, fields } => {
                    commands::talleres::update(&mut app, &id, fields).await
                }
                TallerCommands::Delete { id } => commands::talleres::delete(&mut app, &id).await,
            }
        }

        Commands::Clients { command } => {
            let mut app = App::connect(json)?;
            match command {
                ClientCommands::List { taller } => {
                    commands::clients::list(&mut app, &taller).await
                }
                ClientCommands::Create { taller, fields } => {
                    commands::clients::create(&mut app, taller, fields).await
                }
                ClientCommands::Update { id, taller, fields } => {
                    commands::clients::update(&mut app, &id, taller, fields).await
                }
                ClientCommands::Delete { id } => commands::clients::delete(&mut app, &id).await,
            }
        }

        Commands::Orders { command } => {
            let mut app = App::connect(json)?;
            match command {
                OrderCommands::List { client } => commands::orders::list(&mut app, &client).await,
                OrderCommands::Create { client, fields } => {
                    commands::orders::create(&mut app, client, fields).await
                }
                OrderCommands::Update { id, client, fields } => {
                    commands::orders::update(&mut app, &id, client, fields).await
                }
                OrderCommands::Delete { id } => commands::orders::delete(&mut app, &id).await,
            }
        }

        // No client needed here.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
    }
}
