use anyhow::{Context, Result};
use clap::Parser;

use eth_balance_recon::cli::{Cli, Commands, FetchArgs};
use eth_balance_recon::config::Config;
use eth_balance_recon::etherscan::EtherscanClient;
use eth_balance_recon::models::TxKind;
use eth_balance_recon::{output, recon};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let client = EtherscanClient::new(&config.api_url, &config.api_key)?;

    match cli.command {
        Commands::Reconcile { fetch } => run_reconcile(&client, &fetch).await?,
        Commands::TokenGas { fetch } => run_token_gas(&client, &fetch).await?,
        Commands::Dump {
            address,
            kind,
            out,
            startblock,
            endblock,
        } => {
            // reject an unknown kind before any request goes out
            let kind: TxKind = kind.parse()?;
            let txs = client
                .transactions(kind, &address, startblock, endblock)
                .await?;
            println!("{} {} transactions", txs.len(), kind);
            output::write_json(&out, &txs)?;
        }
    }

    Ok(())
}

async fn run_reconcile(client: &EtherscanClient, fetch: &FetchArgs) -> Result<()> {
    let address = fetch.address.as_str();

    let api_balance = client.eth_balance(address).await?;
    let normal = client
        .transactions(TxKind::Normal, address, fetch.startblock, fetch.endblock)
        .await?;
    let internal = client
        .transactions(TxKind::Internal, address, fetch.startblock, fetch.endblock)
        .await?;
    let merged = recon::merge_chronological(&normal, &internal);

    let sum_normal = recon::net_flow(address, &normal, TxKind::Normal)?;
    let sum_internal = recon::net_flow(address, &internal, TxKind::Internal)?;
    let merged_flow = recon::net_flow_merged(address, &merged)?;
    let calculated_balance = sum_normal + sum_internal;

    if let Some(dir) = &fetch.dump_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed creating dump directory {}", dir.display()))?;
        output::write_json(&dir.join("tx_normal.json"), &normal)?;
        output::write_json(&dir.join("tx_internal.json"), &internal)?;
        output::write_json(&dir.join("tx_merged.json"), &merged)?;
    }

    println!("normal transactions      : {}", normal.len());
    println!("internal transactions    : {}", internal.len());
    println!("merged                   : {}", merged.len());
    match api_balance {
        Some(balance) => println!("api balance (ETH)        : {balance}"),
        None => println!("api balance (ETH)        : unavailable"),
    }
    println!("calculated balance (ETH) : {calculated_balance}");
    println!("  normal net flow        : {sum_normal}");
    println!("  internal net flow      : {sum_internal}");
    println!("merged net flow check    : {merged_flow}");

    Ok(())
}

async fn run_token_gas(client: &EtherscanClient, fetch: &FetchArgs) -> Result<()> {
    let address = fetch.address.as_str();

    for kind in [TxKind::Erc20, TxKind::Erc721, TxKind::Erc1155] {
        let txs = client
            .transactions(kind, address, fetch.startblock, fetch.endblock)
            .await?;
        if txs.is_empty() {
            continue;
        }

        let gas_spend = recon::token_gas_spend(address, &txs)?;
        println!("{} transfer events : {}", kind, txs.len());
        println!("{} gas spend (ETH) : {}", kind, gas_spend);

        if let Some(dir) = &fetch.dump_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed creating dump directory {}", dir.display()))?;
            output::write_json(&dir.join(format!("tx_{kind}.json")), &txs)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
