use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use captionreel::{
    AssemblyConfig, Diagnostics, FrameIndex, KeyValue, PlannedShape, PropertyPath, RecordingHost,
    SceneAssembler,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "captionreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a scene and write the recorded plan as JSON.
    Plan(PlanArgs),
    /// Print every text object's visible body at one frame.
    TextAt(TextAtArgs),
    /// Validate a visual-elements manifest.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Transcript JSON (`{"chunks": [...]}`).
    #[arg(long)]
    transcript: PathBuf,

    /// Visual-elements JSON.
    #[arg(long)]
    visual_elements: Option<PathBuf>,

    /// Assembly config JSON; defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory media paths are resolved against (defaults to the visual-elements file's dir).
    #[arg(long)]
    asset_root: Option<PathBuf>,

    /// Output plan JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Fail with exit status 2 when any diagnostic was raised.
    #[arg(long, default_value_t = false)]
    deny_warnings: bool,
}

#[derive(Parser, Debug)]
struct TextAtArgs {
    #[arg(long)]
    transcript: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame to evaluate.
    #[arg(long, allow_hyphen_values = true)]
    frame: i64,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    #[arg(long)]
    visual_elements: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    deny_warnings: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::TextAt(args) => cmd_text_at(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AssemblyConfig> {
    match path {
        Some(p) => AssemblyConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(AssemblyConfig::default()),
    }
}

fn host_for(cfg: &AssemblyConfig, asset_root: &Path) -> RecordingHost {
    RecordingHost::new(asset_root, cfg.frame_rate, cfg.view_bounds())
}

fn exit_for(diags: &Diagnostics, deny_warnings: bool) -> ExitCode {
    if deny_warnings && !diags.is_empty() {
        eprintln!("{} diagnostic(s) raised with --deny-warnings", diags.len());
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_config(args.config.as_deref())?;
    let asset_root = args
        .asset_root
        .clone()
        .or_else(|| {
            args.visual_elements
                .as_deref()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."));

    let mut host = host_for(&cfg, &asset_root);
    let report = SceneAssembler::new(&cfg)
        .run(&args.transcript, args.visual_elements.as_deref(), &mut host)
        .with_context(|| format!("assemble scene from '{}'", args.transcript.display()))?;

    let mut plan = host.into_plan();
    plan.attach_diagnostics(&report.diagnostics);
    let json = plan.to_json_pretty()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, json)
        .with_context(|| format!("write plan '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} text, {} visual, frames 1..={}, {} diagnostic(s))",
        args.out.display(),
        report.text_objects.len(),
        report.visual_objects.len(),
        report.frame_end.0,
        report.diagnostics.len()
    );
    for d in report.diagnostics.entries() {
        eprintln!("  {d}");
    }
    Ok(exit_for(&report.diagnostics, args.deny_warnings))
}

fn cmd_text_at(args: TextAtArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_config(args.config.as_deref())?;
    let mut host = host_for(&cfg, Path::new("."));
    let mut report = SceneAssembler::new(&cfg)
        .run(&args.transcript, None, &mut host)
        .with_context(|| format!("assemble scene from '{}'", args.transcript.display()))?;

    let frame = FrameIndex(args.frame);
    host.set_current_frame(frame);
    report.tasks.on_frame(frame, &mut host)?;

    let plan = host.plan();
    for placed in &report.text_objects {
        let Some(obj) = plan.object(placed.id) else {
            continue;
        };
        let PlannedShape::Text { body, .. } = &obj.shape else {
            continue;
        };
        let hidden = obj.keyframes.sample(PropertyPath::HideRender, frame)
            == Some(KeyValue::Scalar(1.0));
        println!(
            "{}\t{}\t{}",
            obj.name,
            if hidden { "hidden" } else { "visible" },
            body
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_config(args.config.as_deref())?;
    let mut diags = Diagnostics::new();
    let elements = captionreel::load_visual_elements(
        &args.visual_elements,
        cfg.max_manifest_entries,
        &mut diags,
    );

    for el in &elements {
        let effects: Vec<&str> = el.effects.iter().map(|e| e.as_str()).collect();
        println!(
            "{}\t{:?}\t{:?}\t[{}, {}]\t{}",
            el.file_path,
            el.kind,
            el.media,
            el.interval.start_seconds,
            el.interval.end_seconds,
            effects.join(",")
        );
    }
    eprintln!(
        "{} element(s) accepted, {} diagnostic(s)",
        elements.len(),
        diags.len()
    );
    for d in diags.entries() {
        eprintln!("  {d}");
    }
    Ok(exit_for(&diags, args.deny_warnings))
}
