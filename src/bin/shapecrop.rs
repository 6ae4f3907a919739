use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use shapecrop::{
    DirectoryDownload, Editor, EditorConfig, ExportResolution, GestureInput, Shortcut, Transform,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shapecrop", version)]
struct Cli {
    /// Editor configuration JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available masks.
    Masks,
    /// Clip an image to a mask and write a PNG.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Source photo.
    #[arg(long)]
    image: PathBuf,

    /// Mask id (defaults to the configured default mask).
    #[arg(long)]
    mask: Option<String>,

    /// Output side in pixels: 512, 1024 or 2048.
    #[arg(long)]
    size: Option<ExportResolution>,

    /// Directory the PNG is written to.
    #[arg(long)]
    out_dir: PathBuf,

    /// Initial image scale.
    #[arg(long)]
    scale: Option<f64>,

    /// Initial horizontal offset, in preview canvas pixels.
    #[arg(long, allow_hyphen_values = true)]
    translate_x: Option<f64>,

    /// Initial vertical offset, in preview canvas pixels.
    #[arg(long, allow_hyphen_values = true)]
    translate_y: Option<f64>,

    /// JSON array of gesture inputs and shortcuts replayed before export.
    #[arg(long)]
    script: Option<PathBuf>,
}

/// One replayed interaction.
#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum ScriptStep {
    Gesture(GestureInput),
    Shortcut(Shortcut),
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => EditorConfig::from_path(path)?,
        None => EditorConfig::default(),
    };
    match cli.cmd {
        Command::Masks => cmd_masks(config),
        Command::Export(args) => cmd_export(config, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_masks(config: EditorConfig) -> anyhow::Result<()> {
    let editor = Editor::new(config)?;
    for entry in editor.catalog().entries() {
        println!("{}\t{}\t{}", entry.id, entry.name, entry.path);
    }
    Ok(())
}

fn cmd_export(config: EditorConfig, args: ExportArgs) -> anyhow::Result<()> {
    let resolution = args.size.unwrap_or(config.default_resolution);
    let mut editor = Editor::new(config)?;

    editor.load_image_path(&args.image)?;
    if let Some(id) = &args.mask {
        editor.select_mask(id)?;
    }

    if args.scale.is_some() || args.translate_x.is_some() || args.translate_y.is_some() {
        editor.set_transform(Transform::new(
            args.scale.unwrap_or(1.0),
            args.translate_x.unwrap_or(0.0),
            args.translate_y.unwrap_or(0.0),
        ));
    }
    if let Some(path) = &args.script {
        replay_script(&mut editor, path)?;
    }
    tracing::info!(transform = ?editor.transform(), %resolution, "exporting");

    let mut delivery = DirectoryDownload::new(&args.out_dir);
    let (png, _) = editor
        .export(resolution, &mut delivery)?
        .context("an export is already in progress")?;

    eprintln!("wrote {}", args.out_dir.join(&png.filename).display());
    Ok(())
}

fn replay_script(editor: &mut Editor, path: &Path) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read script '{}'", path.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&json)
        .with_context(|| format!("parse script '{}'", path.display()))?;

    for (i, step) in steps.into_iter().enumerate() {
        match step {
            ScriptStep::Gesture(input) => {
                editor.handle_input(&input);
            }
            ScriptStep::Shortcut(shortcut) => {
                editor.apply_shortcut(shortcut);
            }
            ScriptStep::Key { key, ctrl, shift } => match Shortcut::from_key(&key, ctrl, shift) {
                Some(shortcut) => {
                    editor.apply_shortcut(shortcut);
                }
                None => tracing::warn!(step = i, %key, "no shortcut bound to key"),
            },
        }
    }
    Ok(())
}
