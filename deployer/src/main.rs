//! Sling Deploy - Entry Point
//!
//! Installs and uninstalls OSGi bundles and content on a running Sling
//! instance through the web console, WebDAV or the Sling POST servlet.

use clap::Parser;
use colored::Colorize;

use sling_deploy::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute().await {
        eprintln!("{} {}", "error:".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
        }
        std::process::exit(1);
    }
}
