use cedearpro::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    // Watch installs its own Ctrl-C handler and returns cleanly on it
    match runtime.block_on(commands::run(args)) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("CEDEARPRO - Instrument Sheet Dashboard");
    println!("======================================");
    println!();
    println!("Fetch the published CEDEARPRO sheet, classify each instrument's");
    println!("buy/sell level and print a filtered, sorted view.");
    println!();
    println!("USAGE:");
    println!("    cedearpro <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    show        Fetch once and print the instrument list");
    println!("    watch       Refresh on an interval and print a status line per cycle");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("ENVIRONMENT:");
    println!("    CEDEARPRO_SHEET_URL       Published CSV export URL");
    println!("    CEDEARPRO_REFRESH_SECS    Seconds between refreshes (default 900)");
    println!("    CEDEARPRO_TIMEOUT_MS      Request timeout (default 15000)");
    println!();
    println!("EXAMPLES:");
    println!("    # Buy signals with excellent dividend quality, cheapest first:");
    println!("    cedearpro show --group buy --quality-bucket 90-100 --sort price_local:asc");
    println!();
    println!("    # Search a local export and print JSON:");
    println!("    cedearpro show --file sheet.csv --search apple --format json");
    println!();
    println!("    # Refresh every five minutes:");
    println!("    cedearpro watch --interval 300");
    println!();
    println!("For detailed help on any command, use:");
    println!("    cedearpro <COMMAND> --help");
}
