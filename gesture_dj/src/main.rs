//! gesture_dj — command-line entry point.

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;
use std::sync::mpsc::Receiver;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dj_midi::{list_output_ports, open_or_null, MidiSink, WriterSink};
use gesture_dj::app::{self, RunSummary};
use gesture_dj::cli::Cli;
use gesture_dj::source::{spawn_landmark_source, JsonLinesSource};
use gesture_dj::{Config, Frame, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = &cli.port {
        config.midi.port = Some(port.clone());
    }

    if cli.list_ports {
        return list_ports(&config);
    }

    if !cli.quiet {
        eprintln!();
        eprintln!("╔══════════════════════════════════════════════════════════════╗");
        eprintln!("║          Gesture DJ — hand-tracked MIDI controller           ║");
        eprintln!("╚══════════════════════════════════════════════════════════════╝");
        eprintln!();
    }

    let frames = match open_source(&cli) {
        Ok(rx) => rx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut sink: Box<dyn MidiSink> = if cli.dry_run {
        Box::new(WriterSink::new(io::stdout()))
    } else {
        open_or_null(&config.midi.client_name, config.midi.port.as_deref())
    };

    match app::run(&config, frames, sink.as_mut()) {
        Ok(summary) => report(&cli, &summary),
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn open_source(cli: &Cli) -> Result<Receiver<Frame>> {
    #[cfg(feature = "leap")]
    {
        if cli.leap {
            return Ok(spawn_landmark_source(gesture_dj::source::LeapLandmarkSource::default()));
        }
    }

    if cli.reads_stdin() {
        Ok(spawn_landmark_source(JsonLinesSource::new(BufReader::new(io::stdin()))))
    } else {
        let file = File::open(&cli.input)?;
        Ok(spawn_landmark_source(JsonLinesSource::new(BufReader::new(file))))
    }
}

fn list_ports(config: &Config) -> ExitCode {
    match list_output_ports(&config.midi.client_name) {
        Ok(ports) if ports.is_empty() => {
            println!("No MIDI output ports found.");
            ExitCode::SUCCESS
        }
        Ok(ports) => {
            for (i, name) in ports.iter().enumerate() {
                println!("  {}. {}", i + 1, name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn report(cli: &Cli, summary: &RunSummary) -> ExitCode {
    if !cli.quiet {
        eprintln!();
        eprintln!(
            "Summary: {} frames, {} rejected, {} messages sent, {} send failures",
            summary.frames, summary.rejected, summary.messages, summary.send_failures
        );
    }
    if summary.send_failures > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
