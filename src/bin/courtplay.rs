use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "courtplay", version)]
struct Cli {
    /// Engine options JSON. Defaults plus `COURTPLAY_*` environment overrides when omitted.
    #[arg(long, global = true)]
    opts: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a play and report its shape.
    Validate(InArgs),
    /// Print the flattened timeline as JSON.
    Timeline(InArgs),
    /// Print the resolved state at one instant as JSON.
    Frame(FrameArgs),
    /// Resolve the whole timeline at a fixed frame rate and write it as JSON.
    Export(ExportArgs),
    /// Drive a playback session with fixed ticks and print its status after each.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input play JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InArgs,

    /// Timeline instant in milliseconds.
    #[arg(long, allow_negative_numbers = true)]
    at_ms: f64,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InArgs,

    /// Sampling rate. Falls back to the engine options.
    #[arg(long)]
    fps: Option<u32>,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    input: InArgs,

    /// Wall-clock milliseconds per tick.
    #[arg(long, default_value_t = 16.0)]
    tick_ms: f64,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 60)]
    ticks: u32,

    /// Playback speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Wrap around after the last scene.
    #[arg(long = "loop", default_value_t = false)]
    looping: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let opts = load_opts(cli.opts.as_deref())?;
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Timeline(args) => cmd_timeline(args, &opts),
        Command::Frame(args) => cmd_frame(args, &opts),
        Command::Export(args) => cmd_export(args, &opts),
        Command::Simulate(args) => cmd_simulate(args, &opts),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<courtplay::EngineOpts> {
    let Some(path) = path else {
        return Ok(courtplay::EngineOpts::from_env());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read engine options '{}'", path.display()))?;
    courtplay::EngineOpts::from_json_str(&text)
        .with_context(|| format!("parse engine options '{}'", path.display()))
}

fn read_play_json(path: &Path) -> anyhow::Result<courtplay::Play> {
    let f = File::open(path).with_context(|| format!("open play '{}'", path.display()))?;
    let r = BufReader::new(f);
    let play: courtplay::Play =
        serde_json::from_reader(r).with_context(|| "parse play JSON")?;
    Ok(play)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).with_context(|| "write JSON to stdout")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_validate(args: InArgs) -> anyhow::Result<()> {
    let play = read_play_json(&args.in_path)?;
    play.validate()
        .with_context(|| format!("validate '{}'", args.in_path.display()))?;
    let steps: usize = play.scenes.iter().map(|s| s.timing_groups.len()).sum();
    println!(
        "ok: '{}' has {} scene(s) and {} step(s)",
        play.title,
        play.scene_count(),
        steps
    );
    Ok(())
}

fn cmd_timeline(args: InArgs, opts: &courtplay::EngineOpts) -> anyhow::Result<()> {
    let play = read_play_json(&args.in_path)?;
    let timeline = courtplay::build_timeline(&play, opts.transition_ms);
    print_json(&timeline)
}

fn cmd_frame(args: FrameArgs, opts: &courtplay::EngineOpts) -> anyhow::Result<()> {
    let play = read_play_json(&args.input.in_path)?;
    let resolver = courtplay::FrameResolver::new(play, opts);
    let frame = resolver.try_resolve(args.at_ms)?;
    print_json(&frame)
}

fn cmd_export(args: ExportArgs, opts: &courtplay::EngineOpts) -> anyhow::Result<()> {
    let play = read_play_json(&args.input.in_path)?;
    let fps = args.fps.unwrap_or(opts.export_fps);
    anyhow::ensure!(fps > 0, "fps must be > 0");

    let timeline = courtplay::build_timeline(&play, opts.transition_ms);
    let frames = courtplay::export_frames(&play, &timeline, fps, opts.ease);
    let fingerprint = courtplay::fingerprint_frames(&frames);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &frames)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    w.flush()?;

    eprintln!("wrote {} frame(s) to {}", frames.len(), args.out.display());
    println!("{fingerprint}");
    Ok(())
}

fn cmd_simulate(args: SimulateArgs, opts: &courtplay::EngineOpts) -> anyhow::Result<()> {
    let play = read_play_json(&args.input.in_path)?;
    let timeline = courtplay::build_timeline(&play, opts.transition_ms);
    let mut session = courtplay::PlaybackSession::new(play);
    session.set_speed(args.speed);
    session.set_loop(args.looping);
    session.try_play()?;

    for i in 0..args.ticks {
        session.tick(args.tick_ms);
        let status = session.status();
        println!(
            "{i:>4} {:<8} scene={} step={} acc={:.1} at={}",
            status.state.name(),
            status.scene_index,
            status.step,
            status.accumulator_ms,
            session
                .position_ms(&timeline)
                .map(|ms| format!("{ms:.1}"))
                .unwrap_or_else(|| "-".to_string()),
        );
        if !session.is_playing() {
            break;
        }
    }
    Ok(())
}
