//! CLI for the privacy pool off-chain engine: key lifecycle, sync,
//! prepare/submit spends, and auction bid/settle — the operator surface
//! over `pool-core`/`pool-wallet`/`pool-auction` (spec §1's "any client
//! wallet" made concrete for local use and testing).

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod ledger;
mod password;
mod session;

#[cfg(test)]
mod integration_tests;

use commands::*;

#[derive(Parser)]
#[command(name = "pool")]
#[command(author = "privacy pool engine")]
#[command(version = "0.1.0")]
#[command(about = "Off-chain privacy pool: notes, Merkle accumulator, wallet, and slot auctions")]
#[command(long_about = r#"
A privacy pool off-chain engine: deposit a token and receive a hidden
commitment, later spend it via a zero-knowledge proof without linking the
spend to the deposit.

Quick start:
  1. pool keygen                    Generate a wallet seed
  2. pool deposit --amount 1000     Mint a note for yourself
  3. pool sync                      Recognize it as owned
  4. pool withdraw --amount 1000 --recipient 0x01   Spend it

This binary has no RPC transport (out of scope): it persists a local
`ledger.json` standing in for the chain mirror. Swap `pool-wallet::ChainMirror`
for an RPC-backed implementation to run against a real chain.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new encrypted-at-rest wallet seed.
    Keygen {
        /// Overwrite an existing seed file.
        #[arg(short, long)]
        force: bool,
    },

    /// Resync owned notes against the local ledger.
    Sync,

    /// Show the wallet's private balance.
    Balance,

    /// List every owned note.
    Notes,

    /// Reserve a receive key for a counterparty's transfer.
    Receive,

    /// Show the config directory and engine settings.
    Info,

    /// Mint a note for yourself and record its commitment on the ledger.
    Deposit {
        /// Note amount.
        #[arg(short, long)]
        amount: u128,
    },

    /// Withdraw the smallest owned note covering `amount` to `recipient`.
    Withdraw {
        #[arg(short, long)]
        amount: u128,
        /// Recipient address, field-encoded as hex (e.g. 0x01).
        #[arg(short, long)]
        recipient: String,
    },

    /// Split an owned note into an output and change amount.
    Transfer {
        #[arg(short, long)]
        amount: u128,
        /// Recipient's reserved receive-key secret (self-transfer if omitted).
        #[arg(long)]
        to_secret: Option<String>,
        /// Recipient's reserved receive-key nullifier (self-transfer if omitted).
        #[arg(long)]
        to_nullifier: Option<String>,
    },

    /// Merge two or more owned notes (by commitment) into one.
    Consolidate {
        /// Commitments of the owned notes to merge (hex, at least two).
        #[arg(required = true, num_args = 2..)]
        commitments: Vec<String>,
    },

    /// Auction commands (spec §4.G).
    #[command(subcommand)]
    Auction(AuctionCommands),
}

#[derive(Subcommand)]
enum AuctionCommands {
    /// Submit a bid against the current slot, proving ownership of a note.
    Bid {
        /// Commitment of the owned note backing this bid.
        #[arg(short, long)]
        commitment: String,
        #[arg(short, long)]
        amount: u128,
        /// Bid content, at most 320 bytes.
        #[arg(long, default_value = "")]
        content: String,
        /// Opaque claim commitment carried end-to-end (hex field).
        #[arg(long)]
        claim_commitment: Option<String>,
    },
    /// Settle a closed slot.
    Settle {
        slot_id: u64,
    },
    /// Show slot state.
    Status {
        slot_id: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen { force } => keygen::run(force)?,
        Commands::Sync => sync::run()?,
        Commands::Balance => balance::run()?,
        Commands::Notes => notes::run()?,
        Commands::Receive => receive::run()?,
        Commands::Info => info::run()?,
        Commands::Deposit { amount } => deposit::run(amount)?,
        Commands::Withdraw { amount, recipient } => withdraw::run(amount, recipient)?,
        Commands::Transfer {
            amount,
            to_secret,
            to_nullifier,
        } => transfer::run(amount, to_secret, to_nullifier)?,
        Commands::Consolidate { commitments } => consolidate::run(commitments)?,
        Commands::Auction(AuctionCommands::Bid {
            commitment,
            amount,
            content,
            claim_commitment,
        }) => auction::bid(commitment, amount, content, claim_commitment)?,
        Commands::Auction(AuctionCommands::Settle { slot_id }) => auction::settle(slot_id)?,
        Commands::Auction(AuctionCommands::Status { slot_id }) => auction::status(slot_id)?,
    }

    Ok(())
}
