#![forbid(unsafe_code)]
//! Command-line front end for the notary ledger

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use microloan_ledger::blockchain::Ledger;
use microloan_ledger::cli::{chain_table, init_tracing, short_hash};
use microloan_ledger::config::load_config;
use microloan_ledger::transaction::{hash_transaction, Transaction};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "notary", version, about = "Notarize microloan transfers on an in-memory ledger")]
struct Cli {
    /// Leading zero hex characters required in block hashes (overrides notary.toml)
    #[arg(long, global = true)]
    difficulty: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the digest of a transaction without recording it
    Hash {
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
        #[arg(long)]
        amount: f64,
        /// RFC 3339 timestamp; defaults to now
        #[arg(long)]
        timestamp: Option<String>,
        /// JSON payload carried with the transaction
        #[arg(long)]
        data: Option<String>,
    },
    /// Notarize a batch of sample loans and print the resulting chain
    Demo {
        #[arg(long, default_value_t = 3)]
        loans: u64,
        /// Interest rate in percent applied to repayments
        #[arg(long, default_value_t = 5.0)]
        rate: f64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Hash { from, to, amount, timestamp, data } => {
            let mut tx = Transaction::new(from, to, amount);
            if let Some(ts) = timestamp {
                let parsed = DateTime::parse_from_rfc3339(&ts)
                    .map_err(|e| format!("Invalid timestamp {}: {}", ts, e))?;
                tx = tx.with_timestamp(parsed.with_timezone(&Utc));
            }
            if let Some(raw) = data {
                let payload: serde_json::Value = serde_json::from_str(&raw)
                    .map_err(|e| format!("Invalid --data JSON: {}", e))?;
                tx = tx.with_data(payload);
            }

            println!("{}", hash_transaction(&tx)?);
        }
        Command::Demo { loans, rate } => {
            let difficulty = match cli.difficulty {
                Some(d) => d,
                None => load_config()?.ledger.difficulty,
            };
            run_demo(Ledger::with_difficulty(difficulty)?, loans, rate)?;
        }
    }

    Ok(())
}

fn run_demo(mut ledger: Ledger, loans: u64, rate: f64) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Microloan Notary Ledger".bright_cyan().bold());
    println!("{}", "-----------------------".bright_cyan());
    println!("Difficulty: {}\n", ledger.difficulty().to_string().yellow());

    let started = Instant::now();

    for loan_id in 1..=loans {
        let borrower = loan_id;
        let lender = 100 + loan_id;
        let principal = 50.0 * loan_id as f64;

        let funding = ledger.submit(Transaction::loan_funding(lender, borrower, loan_id, principal))?;
        println!(
            "  {} loan #{:<3} {:>10.2}  {}",
            "funded".green(),
            loan_id,
            principal,
            short_hash(&funding).dimmed()
        );

        let repayment = ledger.submit(Transaction::loan_repayment(borrower, lender, loan_id, principal, rate))?;
        println!(
            "  {} loan #{:<3} {:>10.2}  {}",
            "repaid".blue(),
            loan_id,
            microloan_ledger::transaction::repayment_amount(principal, rate),
            short_hash(&repayment).dimmed()
        );
    }

    let request = ledger.submit(Transaction::sms_loan_request(loans + 1, loans + 1))?;
    println!(
        "  {} loan #{:<3} {:>10}  {}",
        "sms   ".magenta(),
        loans + 1,
        "-",
        short_hash(&request).dimmed()
    );

    println!("\n{}", chain_table(&ledger.get_chain()));

    let stats = ledger.stats();
    println!(
        "Blocks: {}  Transactions: {}  Notarized: {:.2}  Mining time: {:.3}s",
        stats.total_blocks,
        stats.transactions,
        stats.notarized_amount,
        started.elapsed().as_secs_f64()
    );

    if ledger.validate_chain() {
        println!("{}", "Chain is valid".bright_green().bold());
    } else {
        println!("{}", "Chain is INVALID".bright_red().bold());
    }

    Ok(())
}
