use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "eth-balance-recon",
    version,
    about = "Fetch Etherscan account activity and reconcile the balance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Account address to query
    #[arg(long)]
    pub address: String,
    #[arg(long, default_value_t = 0)]
    pub startblock: u64,
    #[arg(long, default_value_t = 99_999_999)]
    pub endblock: u64,
    /// Write the fetched transaction lists as pretty-printed JSON here
    #[arg(long)]
    pub dump_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch normal and internal activity, merge it, and reconcile the
    /// computed balance against the API-reported one
    Reconcile {
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Report Ether spent on gas for ERC-20/721/1155 transfer events
    TokenGas {
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Fetch one kind of transaction list and write it to a JSON file
    Dump {
        #[arg(long)]
        address: String,
        /// normal, internal, erc20, erc721 or erc1155
        #[arg(long)]
        kind: String,
        #[arg(long, default_value = "transactions.json")]
        out: PathBuf,
        #[arg(long, default_value_t = 0)]
        startblock: u64,
        #[arg(long, default_value_t = 99_999_999)]
        endblock: u64,
    },
}
