use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use taskmint_app::forms::{validate_create, validate_submission_link};
use taskmint_app::{logging, AppConfig, BountyListView, BountyRow, ListState, SessionState};
use taskmint_clarity::ClarityValue;
use taskmint_gateway::{
    BountyContract, ContractCallRequest, ContractGateway, HttpReadOnlyClient, Notifier, WalletSlot,
};
use taskmint_types::StacksAddress;
use tokio::sync::watch;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "taskmint")]
#[command(about = "TaskMint - bounty board on the Stacks blockchain", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Override the Stacks API base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the number of bounties the contract has recorded
    Count,

    /// List bounties, newest first
    List {
        /// Derive actions as this address
        #[arg(long = "as", value_name = "ADDRESS")]
        caller: Option<String>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one bounty
    Show {
        id: u64,

        /// Print the raw contract value instead
        #[arg(long)]
        raw: bool,
    },

    /// Build an unsigned contract call for a wallet to sign
    Call {
        #[command(subcommand)]
        command: CallCommands,
    },
}

#[derive(Subcommand)]
enum CallCommands {
    /// Post a new bounty
    CreateBounty {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        description: String,
        /// Reward in STX, e.g. 1.5
        #[arg(long)]
        reward: String,
    },

    /// Submit a link to finished work
    SubmitWork {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        id: u64,
        #[arg(long)]
        link: String,
    },

    /// Approve submitted work and release the reward
    Approve {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        id: u64,
    },

    /// Cancel an open bounty and refund it
    Cancel {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (ignore if it doesn't)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Priority order: CLI args > ENV vars > Config file > Defaults
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url.clone() {
        config.network.api_url = Some(api_url);
    }

    if let Err(e) = logging::init_logging(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        let log_level = logging::effective_level(&config.logging, cli.verbose);
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(format!("taskmint={}", log_level)))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let contract_config = config.contract_config()?;
    info!(
        contract = %contract_config.contract_id(),
        network = %contract_config.network,
        api_url = %contract_config.api_url,
        "Using bounty contract"
    );

    let reader = HttpReadOnlyClient::from_config(&contract_config)?;
    // the CLI never signs, so no wallet is ever loaded
    let gateway = Arc::new(ContractGateway::new(
        contract_config,
        Arc::new(reader),
        WalletSlot::new(),
        Notifier::new(),
    ));

    match cli.command {
        Commands::Count => {
            let count = gateway.get_bounty_count().await?;
            println!("{}", count);
        }
        Commands::List { caller, json } => {
            let caller = caller
                .as_deref()
                .map(StacksAddress::parse)
                .transpose()
                .context("invalid --as address")?;
            list(gateway, caller, json).await?;
        }
        Commands::Show { id, raw } => {
            if raw {
                let value = gateway
                    .read_raw("bounties", vec![ClarityValue::uint(id)])
                    .await?;
                println!("{}", serde_json::to_string_pretty(&value.to_json())?);
            } else {
                match gateway.get_bounty(id).await? {
                    Some(bounty) => {
                        println!("{}", serde_json::to_string_pretty(&BountyRow::new(bounty, None))?)
                    }
                    None => bail!("bounty {} not found", id),
                }
            }
        }
        Commands::Call { command } => {
            let request = build_call(&gateway, command)?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}

async fn list(gateway: Arc<ContractGateway>, caller: Option<StacksAddress>, json: bool) -> Result<()> {
    let session = match caller {
        Some(address) => SessionState::connected(address),
        None => SessionState::default(),
    };
    let (_session_tx, session_rx) = watch::channel(session);
    let view = BountyListView::new(gateway, session_rx);

    match view.load().await {
        ListState::Loaded { count, rows } => {
            debug!(count, rows = rows.len(), "Rendering bounty list");
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            println!("Total Bounties: {}", count);
            if rows.is_empty() {
                println!("No bounties found. Be the first to create a bounty!");
            }
            for row in &rows {
                print_row(row);
            }
            Ok(())
        }
        ListState::Failed { message } => bail!("Error loading bounties: {}", message),
        ListState::Loading => bail!("bounty list did not finish loading"),
    }
}

fn print_row(row: &BountyRow) {
    let bounty = &row.bounty;
    println!();
    println!("#{}  [{}]  {}", bounty.id, row.status_label, row.reward_label);
    println!("  Creator:     {}", row.client_label);
    if let Some(worker) = &row.worker_label {
        println!("  Assigned To: {}", worker);
    }
    let description = if bounty.description.is_empty() {
        "No description provided"
    } else {
        bounty.description.as_str()
    };
    println!("  {}", description);
    if bounty.has_submission() {
        println!("  Submission:  {}", bounty.submission_link);
    }

    let mut actions = Vec::new();
    if row.actions.can_submit_work {
        actions.push("submit work");
    }
    if row.actions.can_approve {
        actions.push("approve work");
    }
    if row.actions.can_cancel {
        actions.push("cancel bounty");
    }
    if !actions.is_empty() {
        println!("  Available actions: {}", actions.join(", "));
    }
    if let Some(notice) = row.notice {
        println!("  {} {}", notice.message(), notice.hint());
    }
}

fn build_call(gateway: &ContractGateway, command: CallCommands) -> Result<ContractCallRequest> {
    let parse_sender = |sender: &str| StacksAddress::parse(sender).context("invalid --sender address");

    let request = match command {
        CallCommands::CreateBounty {
            sender,
            description,
            reward,
        } => {
            let reward = validate_create(&description, &reward)?;
            gateway.build_create_bounty_call(&parse_sender(&sender)?, description.trim(), reward)
        }
        CallCommands::SubmitWork { sender, id, link } => {
            let link = validate_submission_link(&link)?;
            gateway.build_submit_work_call(&parse_sender(&sender)?, id, &link)
        }
        CallCommands::Approve { sender, id } => {
            gateway.build_approve_call(&parse_sender(&sender)?, id)
        }
        CallCommands::Cancel { sender, id } => gateway.build_cancel_call(&parse_sender(&sender)?, id),
    };
    Ok(request)
}
