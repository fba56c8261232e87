use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "masjid-report", version, author, about = "Ramadan field reports for mosque supervisors, backed by a shared spreadsheet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Totals across every daily and maintenance report
    Summary,
    /// List reports, newest first
    List {
        /// Case-insensitive filter on mosque name or day label
        #[arg(long, short)]
        search: Option<String>,
        /// List maintenance reports instead of daily ones
        #[arg(long)]
        maintenance: bool,
    },
    /// Show which days a mosque can still report
    Days {
        /// Mosque code from the mosque sheet
        mosque_code: String,
        /// Check maintenance reports instead of daily ones
        #[arg(long)]
        maintenance: bool,
    },
    /// Submit a report from a JSON file of sheet columns
    Submit {
        /// Path to the JSON object to send
        file: PathBuf,
        /// Send to the maintenance sheet
        #[arg(long)]
        maintenance: bool,
        /// Mosque password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Set the approval status of a report (admin)
    Review {
        /// record_id of the report
        record_id: String,
        /// pending, approved, rejected, resubmit (or the Arabic label)
        status: String,
        /// The record is a maintenance report
        #[arg(long)]
        maintenance: bool,
        /// Admin password (prompted when omitted)
        #[arg(long)]
        admin_password: Option<String>,
    },
    /// Dump every sheet as JSON to stdout
    Export,
    /// Show the config file, or change the endpoint
    Config {
        /// New Apps Script endpoint URL
        #[arg(long)]
        endpoint: Option<String>,
    },
}
