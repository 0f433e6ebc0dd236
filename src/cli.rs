use clap::Parser;
use std::path::PathBuf;

/// Tabular files pulled when no members are named on the command line.
const DEFAULT_MEMBERS: &[&str] = &[
    "agency.txt",
    "stops.txt",
    "routes.txt",
    "trips.txt",
    "stop_times.txt",
    "calendar.txt",
    "calendar_dates.txt",
];

#[derive(Parser, Debug)]
#[command(name = "gtfsgrab")]
#[command(version)]
#[command(about = "Pull tabular feed files out of a GTFS bundle", long_about = None)]
#[command(after_help = "Examples:\n  \
  gtfsgrab feed.zip calendar.txt             pull one member from a local bundle\n  \
  gtfsgrab https://transit.example/gtfs.zip  pull the standard tabular set over HTTP\n  \
  gtfsgrab -l feed.zip                       list bundle contents\n  \
  gtfsgrab --json -d out feed.zip stops.txt  write stops as JSON records into out/")]
pub struct Cli {
    /// Feed bundle: local ZIP path or HTTP(S) URL
    #[arg(value_name = "FEED")]
    pub feed: String,

    /// Member file names to pull (default: the standard GTFS tabular set)
    #[arg(value_name = "MEMBERS")]
    pub members: Vec<String>,

    /// List bundle contents and exit
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Write outputs into DIR (default: current directory)
    #[arg(short = 'd', long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Write parsed records as JSON instead of raw text
    #[arg(long)]
    pub json: bool,

    /// Print member text to stdout instead of writing files
    #[arg(short = 'p', long)]
    pub pipe: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.feed.starts_with("http://") || self.feed.starts_with("https://")
    }

    /// Requested member basenames, falling back to the standard set.
    pub fn wanted_members(&self) -> Vec<String> {
        if self.members.is_empty() {
            DEFAULT_MEMBERS.iter().map(|m| m.to_string()).collect()
        } else {
            self.members.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection() {
        let cli = Cli::parse_from(["gtfsgrab", "https://transit.example/gtfs.zip"]);
        assert!(cli.is_http_url());
        let cli = Cli::parse_from(["gtfsgrab", "feed.zip"]);
        assert!(!cli.is_http_url());
    }

    #[test]
    fn members_default_to_standard_set() {
        let cli = Cli::parse_from(["gtfsgrab", "feed.zip"]);
        assert!(cli.wanted_members().contains(&"calendar.txt".to_string()));
        let cli = Cli::parse_from(["gtfsgrab", "feed.zip", "fares.txt"]);
        assert_eq!(cli.wanted_members(), vec!["fares.txt"]);
    }
}
