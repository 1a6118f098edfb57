use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wrapweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a design snapshot as texture and thumbnail PNGs.
    Render(RenderArgs),
    /// Check a design snapshot for export completeness.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input design snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Asset root for bundled overlays and masks. Defaults to the input
    /// file's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output texture PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output thumbnail PNG path.
    #[arg(long)]
    thumb: Option<PathBuf>,

    /// Thumbnail edge length in pixels.
    #[arg(long, default_value_t = 512)]
    thumb_size: u32,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input design snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn read_state(path: &Path) -> anyhow::Result<wrapweave::EditorState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open design snapshot '{}'", path.display()))?;
    let file = wrapweave::SnapshotFile::from_json(&json).with_context(|| "parse snapshot JSON")?;
    Ok(wrapweave::EditorState::from_snapshot(file.migrate()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let state = read_state(&args.in_path)?;

    let assets_root = args
        .assets
        .clone()
        .unwrap_or_else(|| {
            args.in_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf()
        });
    let mut fetcher = wrapweave::DirFetcher::new(assets_root);

    let opts = wrapweave::ExportOptions {
        thumbnail_size: args.thumb_size,
    };
    let artifacts = wrapweave::export_design(&state, opts, chrono::Utc::now(), &mut fetcher)?;

    for warning in &artifacts.warnings {
        eprintln!("warning: {warning}");
    }

    write_bytes(&args.out, &artifacts.combined_png)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(thumb) = &args.thumb {
        write_bytes(thumb, &artifacts.thumbnail_png)?;
        eprintln!("wrote {}", thumb.display());
    }

    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let state = read_state(&args.in_path)?;
    let panels = wrapweave::linked_panels(&state);

    match wrapweave::validate_complete(&panels) {
        Ok(()) => {
            eprintln!("ok: all panels complete");
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))
}
