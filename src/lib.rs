pub mod cli;
pub mod config;
pub mod etherscan;
pub mod models;
pub mod output;
pub mod recon;
