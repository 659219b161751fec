//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// gesture_dj - hand-gesture MIDI controller for DJ software
///
/// Reads hand landmark frames (JSON lines, 21 points per hand) and sends
/// play presses and volume/EQ control changes to a MIDI output port.
#[derive(Parser, Debug)]
#[command(name = "gesture_dj")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Landmark frames, one JSON object per line ("-" for stdin)
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub input: PathBuf,

    /// MIDI output port to open (substring match, overrides the config file)
    #[arg(short, long, value_name = "NAME")]
    pub port: Option<String>,

    /// List MIDI output ports and exit
    #[arg(long, default_value = "false")]
    pub list_ports: bool,

    /// Print messages to stdout instead of sending them
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Read landmarks from a LeapMotion controller instead of --input
    #[cfg(feature = "leap")]
    #[arg(long, default_value = "false")]
    pub leap: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// True when frames should come from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    /// Log filter directive implied by -v / -q.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
