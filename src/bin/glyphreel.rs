use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use glyphreel::{
    CaseMode, ClipLibrary, Config, DryRunEngine, FfmpegEngine, GlyphMetricsTable,
    OffsetOverrides, PreviewWriter, StillLibrary, WithOverrides,
};

#[derive(Parser, Debug)]
#[command(name = "glyphreel", version, about = "Render text as screen-blended glyph video")]
struct Cli {
    /// Config JSON (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a PNG preview from still images.
    Preview(PreviewArgs),
    /// Print the ffmpeg filter graph without rendering.
    Plan(PlanArgs),
    /// Inspect or edit vertical offset overrides.
    Offsets {
        #[command(subcommand)]
        cmd: OffsetsCommand,
    },
    /// Extract preview stills from the clip library (requires `ffmpeg` on PATH).
    Stills(StillsArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct StyleArgs {
    /// Case normalization.
    #[arg(long, value_enum)]
    case: Option<CaseArg>,
    /// Lower-case glyph size in pixels.
    #[arg(long)]
    size: Option<u32>,
    /// Gap between glyphs as a fraction of the glyph size (negative overlaps).
    #[arg(long, allow_negative_numbers = true)]
    spacing: Option<f64>,
    /// Advance of a space in pixels.
    #[arg(long)]
    space_width: Option<u32>,
    /// Video duration in seconds.
    #[arg(long)]
    duration: Option<f64>,
    /// Video frame rate.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum CaseArg {
    Upper,
    Lower,
    Mixed,
}

impl From<CaseArg> for CaseMode {
    fn from(v: CaseArg) -> Self {
        match v {
            CaseArg::Upper => CaseMode::Upper,
            CaseArg::Lower => CaseMode::Lower,
            CaseArg::Mixed => CaseMode::Mixed,
        }
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text to render (empty uses the configured fallback).
    #[arg(default_value = "")]
    text: String,

    /// Output MP4 path (default: `<output_dir>/generated_<text>.mp4`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log the ffmpeg command instead of running it.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Text to preview (empty uses the configured preview fallback).
    #[arg(default_value = "")]
    text: String,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Text to plan.
    #[arg(default_value = "")]
    text: String,

    /// Print layout, inputs and arguments as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Subcommand, Debug)]
enum OffsetsCommand {
    /// List overrides.
    List,
    /// Set the vertical offset of a character.
    Set {
        /// Character to adjust.
        ch: char,
        /// Offset in pixels at the reference glyph size.
        #[arg(allow_negative_numbers = true)]
        px: i32,
    },
    /// Remove the override of a character.
    Clear {
        /// Character to reset.
        ch: char,
    },
}

#[derive(Parser, Debug)]
struct StillsArgs {
    /// Edge length of the extracted stills.
    #[arg(long, default_value_t = 300)]
    size: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    match cli.cmd {
        Command::Render(args) => cmd_render(cfg, args),
        Command::Preview(args) => cmd_preview(cfg, args),
        Command::Plan(args) => cmd_plan(cfg, args),
        Command::Offsets { cmd } => cmd_offsets(&cfg, cmd),
        Command::Stills(args) => cmd_stills(&cfg, args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_style(mut cfg: Config, args: &StyleArgs) -> anyhow::Result<Config> {
    if let Some(case) = args.case {
        cfg.style.case_mode = case.into();
    }
    if let Some(size) = args.size {
        cfg.style.base_char_size = size;
    }
    if let Some(spacing) = args.spacing {
        cfg.style.char_spacing_factor = spacing;
    }
    if let Some(space_width) = args.space_width {
        cfg.style.space_width = space_width;
    }
    if let Some(duration) = args.duration {
        cfg.style.duration_secs = duration;
    }
    if let Some(fps) = args.fps {
        cfg.style.fps = fps;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_overrides(cfg: &Config) -> anyhow::Result<OffsetOverrides> {
    OffsetOverrides::load(&cfg.offsets_path).with_context(|| {
        format!(
            "load offset overrides '{}'",
            cfg.offsets_path.display()
        )
    })
}

fn cmd_render(cfg: Config, args: RenderArgs) -> anyhow::Result<()> {
    let cfg = apply_style(cfg, &args.style)?;
    let table = GlyphMetricsTable::builtin();
    let overrides = load_overrides(&cfg)?;
    let metrics = WithOverrides::new(&table, &overrides);
    let clips = ClipLibrary::new(&cfg.clips_dir);

    if args.dry_run {
        let mut engine = DryRunEngine::new();
        glyphreel::render_video(&args.text, &cfg, &metrics, &clips, &mut engine, args.out)?;
        for program in engine.programs() {
            println!("{}", program.command_line());
        }
        return Ok(());
    }

    let mut engine = FfmpegEngine::new();
    let out = glyphreel::render_video(&args.text, &cfg, &metrics, &clips, &mut engine, args.out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_preview(cfg: Config, args: PreviewArgs) -> anyhow::Result<()> {
    let cfg = apply_style(cfg, &args.style)?;
    let table = GlyphMetricsTable::builtin();
    let overrides = load_overrides(&cfg)?;
    let metrics = WithOverrides::new(&table, &overrides);
    let stills = StillLibrary::load_dir(&cfg.stills_dir)?;
    let writer = PreviewWriter::new(&cfg.preview_dir);

    let out = glyphreel::render_preview_file(&args.text, &cfg, &metrics, &stills, &writer)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_plan(cfg: Config, args: PlanArgs) -> anyhow::Result<()> {
    let cfg = apply_style(cfg, &args.style)?;
    let table = GlyphMetricsTable::builtin();
    let overrides = load_overrides(&cfg)?;
    let metrics = WithOverrides::new(&table, &overrides);
    let clips = ClipLibrary::new(&cfg.clips_dir);

    let plan = glyphreel::plan_video(&args.text, &cfg, &metrics, &clips, None)?;
    if !args.json {
        println!("{}", plan.program.filter_complex);
        return Ok(());
    }

    let layout = &plan.layout;
    let glyphs = layout
        .glyphs()
        .map(|g| {
            serde_json::json!({
                "char": g.key.ch.to_string(),
                "case": g.key.case.as_str(),
                "index": g.index,
                "x": layout.canvas_x(g),
                "y": g.y,
                "size": g.size,
            })
        })
        .collect::<Vec<_>>();
    let instructions = plan
        .graph
        .instructions
        .iter()
        .map(|i| serde_json::json!({ "output": i.output.to_string(), "op": i.op.name() }))
        .collect::<Vec<_>>();
    let doc = serde_json::json!({
        "text": layout.text,
        "total_width": layout.total_width,
        "x_offset": layout.x_offset,
        "applied_scale": layout.applied_scale,
        "glyphs": glyphs,
        "inputs": plan.program.inputs,
        "instructions": instructions,
        "filter_complex": plan.program.filter_complex,
        "output": plan.program.output,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cmd_offsets(cfg: &Config, cmd: OffsetsCommand) -> anyhow::Result<()> {
    let mut overrides = load_overrides(cfg)?;
    match cmd {
        OffsetsCommand::List => {
            for (ch, px) in overrides.iter() {
                println!("{ch}\t{px}");
            }
        }
        OffsetsCommand::Set { ch, px } => {
            overrides.set(ch, px);
            overrides.save(&cfg.offsets_path)?;
            eprintln!("set '{ch}' = {px}");
        }
        OffsetsCommand::Clear { ch } => {
            if overrides.clear(ch).is_some() {
                overrides.save(&cfg.offsets_path)?;
                eprintln!("cleared '{ch}'");
            } else {
                eprintln!("no override for '{ch}'");
            }
        }
    }
    Ok(())
}

fn cmd_stills(cfg: &Config, args: StillsArgs) -> anyhow::Result<()> {
    let clips = ClipLibrary::new(&cfg.clips_dir);
    let count = glyphreel::extract_stills(&cfg.encode, &clips, &cfg.stills_dir, args.size)?;
    eprintln!("wrote {count} stills to {}", cfg.stills_dir.display());
    Ok(())
}
