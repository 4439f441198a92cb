use clap::{Parser, Subcommand};

mod commands;

use commands::{FeesArgs, QuoteArgs, SellArgs};

#[derive(Parser)]
#[command(name = "steam-seller")]
#[command(about = "Lists Steam inventory items at the highest buy order", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sell every marketable inventory item at its highest buy order
    Sell(SellArgs),
    /// Show what the seller receives when a buyer pays a given price
    Quote(QuoteArgs),
    /// Show the fees added on top of a payout
    Fees(FeesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match &cli.command {
        Commands::Sell(SellArgs {
            log_file: Some(path),
            ..
        }) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    match cli.command {
        Commands::Sell(args) => commands::run_sell(args).await?,
        Commands::Quote(args) => commands::run_quote(args)?,
        Commands::Fees(args) => commands::run_fees(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_sell() {
        let cli = Cli::try_parse_from([
            "steam-seller",
            "sell",
            "--dry-run",
            "--log-file",
            "seller.log",
        ])
        .unwrap();
        match cli.command {
            Commands::Sell(args) => {
                assert!(args.dry_run);
                assert_eq!(args.config, "config/Config.toml");
                assert_eq!(args.log_file.as_deref(), Some("seller.log"));
            }
            _ => panic!("expected sell"),
        }
    }

    #[test]
    fn test_parse_quote_with_publisher_fee() {
        let cli = Cli::try_parse_from([
            "steam-seller",
            "quote",
            "--buyer-price",
            "115",
            "--publisher-fee",
            "0.15",
        ])
        .unwrap();
        match cli.command {
            Commands::Quote(args) => {
                assert_eq!(args.buyer_price, 115);
                assert_eq!(args.publisher_fee, Some(dec!(0.15)));
            }
            _ => panic!("expected quote"),
        }
    }

    #[test]
    fn test_parse_fees() {
        let cli =
            Cli::try_parse_from(["steam-seller", "fees", "--received", "100", "-c", "my.toml"])
                .unwrap();
        match cli.command {
            Commands::Fees(args) => {
                assert_eq!(args.received, 100);
                assert_eq!(args.publisher_fee, None);
                assert_eq!(args.config, "my.toml");
            }
            _ => panic!("expected fees"),
        }
    }

    #[test]
    fn test_negative_amounts_rejected() {
        assert!(Cli::try_parse_from(["steam-seller", "quote", "--buyer-price", "-5"]).is_err());
        assert!(Cli::try_parse_from(["steam-seller", "fees", "--received", "x"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
