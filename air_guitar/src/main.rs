//! air_guitar: command-line entry point.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use air_guitar::{
    run, spawn_quit_listener, AppConfig, FrameClock, HttpPoseSource, ImageDirSource, PoseClient,
    PoseSource, ReplayPoseSource, Session,
};
use chord_bank::ChordBank;
use strum_midi::{list_output_ports, open_output, GuitarProgram, MidiSink, NoteDispatcher, NullSink};

#[derive(Parser, Debug)]
#[command(name = "air_guitar", version, about = "Play guitar chords with your webcam")]
struct Args {
    /// Chord file, one `NAME:f|f|f|f|f|f` per line
    #[arg(required_unless_present = "list_ports")]
    chords: Option<PathBuf>,

    /// Directory of captured frames to send to the pose service
    #[arg(long, value_name = "DIR", conflicts_with = "replay")]
    frames: Option<PathBuf>,

    /// Replay recorded poses (JSON Lines) instead of calling the pose service
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Pose service endpoint
    #[arg(long, value_name = "URL")]
    pose_url: Option<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// MIDI output port (name substring), or `null` for silence
    #[arg(long, value_name = "PORT")]
    midi: Option<String>,

    /// List MIDI output ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Start over when the frames or recording run out
    #[arg(long = "loop")]
    repeat: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = real_main(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "air_guitar=info,strum_midi=info",
        1 => "air_guitar=debug,strum_midi=debug,strum_gesture=debug",
        _ => "air_guitar=trace,strum_midi=trace,strum_gesture=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(args: Args) -> Result<()> {
    if args.list_ports {
        let ports = list_output_ports().context("cannot enumerate MIDI outputs")?;
        if ports.is_empty() {
            println!("  (no MIDI output ports)");
        }
        for (i, name) in ports.iter().enumerate() {
            println!("  {:>2}  {}", i, name);
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(url) = &args.pose_url {
        config.pose_url = url.clone();
    }

    // `required_unless_present` guarantees this once --list-ports is handled.
    let chords_path = args.chords.as_ref().context("no chord file given")?;
    let bank = ChordBank::load(chords_path)
        .with_context(|| format!("loading chords from {}", chords_path.display()))?;

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                Air Guitar: strum with your webcam            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    for (zone, chord) in bank.iter().enumerate() {
        println!("  zone {:>2}  {}", zone, chord);
    }
    println!();

    let sink: Arc<dyn MidiSink> = match args.midi.as_deref() {
        Some(q) if q.eq_ignore_ascii_case("null") => Arc::new(NullSink),
        query => open_output("air_guitar", query).context("cannot open MIDI output")?,
    };
    let dispatcher = NoteDispatcher::new(sink, config.dispatch.clone());
    dispatcher.select_program().context("cannot select instrument")?;
    info!(
        port = dispatcher.sink_name(),
        program = config.dispatch.program,
        instrument = GuitarProgram::from_program(config.dispatch.program).map_or("non-guitar", |g| g.name()),
        "MIDI ready"
    );

    let mut source: Box<dyn PoseSource> = match &args.replay {
        Some(path) => {
            info!(file = %path.display(), "replaying recorded poses");
            Box::new(
                ReplayPoseSource::open(path, args.repeat)
                    .with_context(|| format!("opening recording {}", path.display()))?,
            )
        }
        None => {
            let dir = args.frames.clone().unwrap_or_else(|| PathBuf::from("frames"));
            let frames = ImageDirSource::open(&dir, args.repeat)
                .with_context(|| format!("opening frames in {}", dir.display()))?;
            let client = PoseClient::new(&config.pose_url, Duration::from_millis(config.request_timeout_ms))
                .context("cannot build pose service client")?;
            info!(frames = frames.len(), url = %config.pose_url, "sending frames to pose service");
            Box::new(HttpPoseSource::new(client, frames))
        }
    };

    let mut session = Session::new(bank, &config, dispatcher);
    let mut clock = FrameClock::new(config.report_every);
    let stop = Arc::new(AtomicBool::new(false));
    spawn_quit_listener(std::io::BufReader::new(std::io::stdin()), Arc::clone(&stop));
    println!("  Type q + Enter to stop.");
    println!();
    let summary = run(&mut session, source.as_mut(), &mut clock, &stop);

    println!();
    println!(
        "  {} frames  ({} skipped, {} source errors)  {} strums",
        summary.frames, summary.skipped, summary.source_errors, summary.strums
    );
    Ok(())
}
