use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

use karaoke_reel::{
    ApproxMeasure, CpuBackend, Evaluator, FontRole, Fps, FrameIndex, FrameRange, ParleyMeasure,
    PngSequenceSink, PreparedFonts, PreparedReel, ReelComposition, ReelConfig, RenderSettings,
    RenderThreading, RenderToMp4Opts, VideoScript, WordMeasure,
};

#[derive(Parser, Debug)]
#[command(name = "karaoke-reel", version, about = "Render karaoke narration reels")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the segment timeline.
    Plan(PlanArgs),
    /// Print the evaluated state of one frame as JSON.
    Eval(EvalArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
    /// Write the built-in demo script as JSON.
    DemoScript(DemoScriptArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Script JSON. Defaults to the built-in demo script.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Render config JSON. Defaults to the stock theme.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory fonts and narration are resolved against. Defaults to the config's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Override the configured frame rate (whole frames per second).
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args, Debug)]
struct EvalArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print font diagnostics (family name + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output MP4 path.
    #[arg(long, required_unless_present = "png_dir")]
    out: Option<PathBuf>,

    /// Write `frame_NNNNNN.png` files here instead of an MP4.
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Leave the narration out of the MP4.
    #[arg(long)]
    no_audio: bool,

    /// Render chunks on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// First frame to render.
    #[arg(long)]
    start: Option<u64>,

    /// One past the last frame to render.
    #[arg(long)]
    end: Option<u64>,

    /// Print font diagnostics (family name + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Args, Debug)]
struct DemoScriptArgs {
    /// Output path. Prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::DemoScript(args) => cmd_demo_script(args),
    }
}

struct Inputs {
    comp: ReelComposition,
    assets_root: PathBuf,
}

fn load_inputs(args: &InputArgs) -> anyhow::Result<Inputs> {
    let script = match &args.script {
        Some(path) => VideoScript::from_path(path)
            .with_context(|| format!("load script '{}'", path.display()))?,
        None => VideoScript::demo(),
    };
    let mut config = match &args.config {
        Some(path) => ReelConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => ReelConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.fps = Fps::new(fps, 1)?;
    }

    let assets_root = match (&args.assets, &args.config) {
        (Some(dir), _) => dir.clone(),
        (None, Some(cfg)) => cfg
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        (None, None) => PathBuf::from("."),
    };

    let comp = ReelComposition::new(config, script);
    comp.validate()?;
    Ok(Inputs { comp, assets_root })
}

fn load_fonts(inputs: &Inputs) -> anyhow::Result<PreparedFonts> {
    PreparedFonts::load(&inputs.comp.config.fonts, &inputs.assets_root).with_context(|| {
        format!(
            "load fonts from assets root '{}'",
            inputs.assets_root.display()
        )
    })
}

fn prepare(inputs: &Inputs, fonts: &PreparedFonts) -> anyhow::Result<PreparedReel> {
    let mut measure = ParleyMeasure::new(fonts.clone());
    Ok(PreparedReel::prepare(&inputs.comp, &mut measure)?)
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let inputs = load_inputs(&args.input)?;
    let timeline = inputs.comp.timeline()?;
    let fps = timeline.fps;

    println!(
        "{} frames at {}/{} fps ({:.2}s)",
        timeline.duration,
        fps.num,
        fps.den,
        timeline.duration_secs()
    );
    for seg in &timeline.segments {
        println!(
            "{:<10} {:>6} {:>6} {:>7.2}s {:>3} words",
            seg.label,
            seg.range.start.0,
            seg.range.end.0,
            fps.frames_to_secs(seg.range.len_frames()),
            karaoke_reel::split_words(&seg.text).len()
        );
    }
    let tags = &inputs.comp.script.metadata.hashtags;
    if !tags.is_empty() {
        println!("hashtags: {}", tags.join(" "));
    }
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let inputs = load_inputs(&args.input)?;
    let mut measure: Box<dyn WordMeasure> = match load_fonts(&inputs) {
        Ok(fonts) => Box::new(ParleyMeasure::new(fonts)),
        Err(e) => {
            tracing::warn!("{e:#}; measuring words with approximate metrics");
            Box::new(ApproxMeasure::default())
        }
    };
    let prepared = PreparedReel::prepare(&inputs.comp, measure.as_mut())?;
    let eval = Evaluator::eval_frame(&prepared, FrameIndex(args.frame))?;
    println!("{}", serde_json::to_string_pretty(&eval)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let inputs = load_inputs(&args.input)?;
    let fonts = load_fonts(&inputs)?;
    if args.dump_fonts {
        dump_font_diagnostics(&fonts);
    }
    let prepared = prepare(&inputs, &fonts)?;

    let mut backend = CpuBackend::new(RenderSettings { fonts });
    let frame = karaoke_reel::render_frame(&prepared, FrameIndex(args.frame), &mut backend)?;
    karaoke_reel::write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let inputs = load_inputs(&args.input)?;
    let fonts = load_fonts(&inputs)?;
    if args.dump_fonts {
        dump_font_diagnostics(&fonts);
    }
    let prepared = prepare(&inputs, &fonts)?;
    let range = FrameRange::new(
        FrameIndex(args.start.unwrap_or(0)),
        FrameIndex(args.end.unwrap_or(prepared.duration_frames())),
    )?;
    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };
    let mut backend = CpuBackend::new(RenderSettings { fonts });

    if let Some(dir) = &args.png_dir {
        let mut sink = PngSequenceSink::new(dir);
        let stats = karaoke_reel::render_to_sink(
            &prepared,
            range,
            &mut backend,
            &threading,
            &mut sink,
            None,
        )?;
        eprintln!(
            "wrote {} frames to {}",
            stats.frames_rendered,
            dir.display()
        );
        return Ok(());
    }

    let out = args
        .out
        .context("--out is required unless --png-dir is given")?;
    let opts = RenderToMp4Opts {
        range: Some(range),
        audio: !args.no_audio,
        threading,
        ..RenderToMp4Opts::new(&out)
    };
    let stats = karaoke_reel::render_to_mp4(&prepared, &opts, &mut backend, &inputs.assets_root)?;

    eprintln!(
        "wrote {} ({} frames, {} chunks)",
        out.display(),
        stats.frames_rendered,
        stats.chunks
    );
    Ok(())
}

fn cmd_demo_script(args: DemoScriptArgs) -> anyhow::Result<()> {
    let json = VideoScript::demo().to_json_pretty()?;
    match args.out {
        Some(path) => {
            karaoke_reel::ensure_parent_dir(&path)?;
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("write script '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn dump_font_diagnostics(fonts: &PreparedFonts) {
    eprintln!("font diagnostics:");
    for (name, role) in [("words", FontRole::Words), ("label", FontRole::Label)] {
        let font = fonts.font_for(role);
        eprintln!("  {name}:");
        eprintln!("    source: {}", font.source);
        eprintln!("    family: {}", font.family);
        eprintln!("    sha256: {}", sha256_hex(&font.bytes));
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
