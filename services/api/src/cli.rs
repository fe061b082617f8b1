use crate::demo::{run_demo, run_grade, run_mobility, run_quote, DemoArgs, GradeArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use estate_metrics::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Estate Metrics",
    about = "Serve and explore real-estate listing metrics from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Quote a fixed-rate mortgage with escrow estimates
    Quote(QuoteArgs),
    /// Grade energy consumption and emissions on the A-G scale
    Grade(GradeArgs),
    /// Show walk, transit and bike scores for a city
    Mobility {
        /// City name; unknown cities fall back to default scores
        city: String,
    },
    /// Generate synthetic listings and print a market report
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Synthetic listings loaded into the in-memory store at startup
    #[arg(long, default_value_t = 200)]
    pub(crate) demo_listings: usize,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            demo_listings: 200,
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Grade(args) => run_grade(args),
        Command::Mobility { city } => run_mobility(&city),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["estate-metrics"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_quote_arguments() {
        let cli = Cli::try_parse_from([
            "estate-metrics",
            "quote",
            "--price",
            "300000",
            "--down-payment",
            "60000",
            "--rate",
            "3.5",
            "--years",
            "25",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Quote(args)) => {
                assert_eq!(args.price, 300_000.0);
                assert_eq!(args.down_payment, 60_000.0);
                assert_eq!(args.years, 25);
                assert!(!args.schedule);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_demo_seed_and_date() {
        let cli = Cli::try_parse_from([
            "estate-metrics",
            "demo",
            "--count",
            "12",
            "--seed",
            "7",
            "--listed-since",
            "2025-03-01",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.count, 12);
                assert_eq!(args.seed, Some(7));
                assert!(args.listed_since.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
