use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "stardrift", version, about = "Render procedural backdrop animations")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render every frame of the scene as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene config JSON. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    backdrop: Option<BackdropChoice>,

    /// Seed in [0, 1e9). Random when neither this nor the config sets one.
    #[arg(long)]
    seed: Option<u32>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Frames per second (integer).
    #[arg(long)]
    fps: Option<u32>,

    /// Animation length in seconds.
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Elapsed animation time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print the frame fingerprint to stdout.
    #[arg(long)]
    digest: bool,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory.
    #[arg(long)]
    dir: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Refuse to replace an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackdropChoice {
    Sky,
    Sine,
    Circuit,
}

impl From<BackdropChoice> for stardrift::BackdropKind {
    fn from(c: BackdropChoice) -> Self {
        match c {
            BackdropChoice::Sky => Self::Sky,
            BackdropChoice::Sine => Self::Sine,
            BackdropChoice::Circuit => Self::Circuit,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scene(args: &SceneArgs) -> anyhow::Result<stardrift::SceneConfig> {
    let mut scene = match &args.config {
        Some(path) => stardrift::SceneConfig::load(path)?,
        None => stardrift::SceneConfig::default(),
    };
    if let Some(b) = args.backdrop {
        scene.backdrop = b.into();
    }
    if let Some(seed) = args.seed {
        scene.seed = Some(seed);
    }
    if let Some(w) = args.width {
        scene.canvas.width = w;
    }
    if let Some(h) = args.height {
        scene.canvas.height = h;
    }
    if let Some(fps) = args.fps {
        scene.fps = stardrift::Fps::new(fps, 1)?;
    }
    if let Some(d) = args.duration {
        scene.duration_s = d;
    }
    // Pin the seed so every frame of this run shares it.
    scene.seed.get_or_insert_with(stardrift::random_seed);
    scene.validate()?;
    tracing::info!(?scene, "scene");
    Ok(scene)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let frame = stardrift::render_frame(&scene, args.time)?;
    stardrift::save_png(&frame, &args.out)?;

    if args.digest {
        println!("{}", stardrift::fingerprint_frame(&frame));
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let written = stardrift::render_png_sequence(&scene, &args.dir)?;
    eprintln!("wrote {} frames to {}", written.len(), args.dir.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let opts = stardrift::RenderToMp4Opts {
        overwrite: !args.no_overwrite,
        ..Default::default()
    };
    stardrift::render_to_mp4(&scene, &args.out, opts)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
