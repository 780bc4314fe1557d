use board_slicer::board::{Board, Sizing};
use board_slicer::config::{self, EngineConfig};
use board_slicer::crop::{self, CropConfig};
use board_slicer::imaging::{ImageBackend, RustBackend, format_extension, format_name};
use board_slicer::output::{self, CardEntry, CropReport, ResizeEntry};
use board_slicer::resize::{self, Reduction, ResizeConfig};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "board-slicer")]
#[command(about = "Cut card-game board images into cards and make reduced copies")]
#[command(long_about = "\
Cut card-game board images into cards and make reduced copies

A board is one image of a game board laid out as a regular grid of cards.
`crop` writes one image per grid cell, row by row from the top-left corner.
`resize` writes copies of boards reduced by an integer factor. Every output
keeps the format of its input: a JPEG board gives JPEG cards.

Set RUST_LOG=debug to trace the geometry of each operation.

Run 'board-slicer gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Engine configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cut a board image into one image per grid cell
    Crop {
        /// Board image
        board: PathBuf,
        /// Number of card columns
        #[arg(long)]
        columns: i64,
        /// Number of card rows
        #[arg(long)]
        rows: i64,
        /// Directory for the card images and manifest.json
        #[arg(long, default_value = "cards")]
        output: PathBuf,
    },
    /// Write copies of board images reduced by an integer factor
    Resize {
        /// Board images
        #[arg(required = true)]
        boards: Vec<PathBuf>,
        /// Divide width and height by this factor
        #[arg(long)]
        reduction: i64,
        /// Directory for the reduced copies
        #[arg(long, default_value = "reduced")]
        output: PathBuf,
    },
    /// Print an image's format and dimensions
    Identify {
        image: PathBuf,
    },
    /// List the card classification types
    CardTypes,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Crop {
            board,
            columns,
            rows,
            output: out_dir,
        } => {
            let sizing = Sizing::new(columns, rows)?;
            let report = crop_command(&board, sizing, &out_dir, &engine_config)?;
            let manifest_path = out_dir.join("manifest.json");
            std::fs::write(&manifest_path, serde_json::to_string_pretty(&report)?)?;
            output::print_crop_output(&report);
        }
        Command::Resize {
            boards,
            reduction,
            output: out_dir,
        } => {
            let reduction = Reduction::new(reduction)?;
            init_thread_pool(&engine_config.processing);
            let entries = resize_command(&boards, reduction, &out_dir, &engine_config)?;
            output::print_resize_output(&entries, reduction.factor());
        }
        Command::Identify { image } => {
            let data = std::fs::read(&image)?;
            let info = RustBackend::new().identify(&data)?;
            output::print_identify_output(
                &image,
                &format_name(info.format),
                info.dimensions.width,
                info.dimensions.height,
            );
        }
        Command::CardTypes => output::print_card_types(),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn crop_command(
    board_path: &Path,
    sizing: Sizing,
    output_dir: &Path,
    engine_config: &EngineConfig,
) -> Result<CropReport, Box<dyn std::error::Error>> {
    let backend = RustBackend::new();
    let data = std::fs::read(board_path)?;
    let info = backend.identify(&data)?;
    let cells = crop::crop_with_backend(
        &backend,
        &data,
        sizing,
        &CropConfig::from_engine_config(engine_config),
    )?;

    std::fs::create_dir_all(output_dir)?;
    let mut cards = Vec::with_capacity(cells.len());
    for (index, cell) in cells.iter().enumerate() {
        let cell_info = backend.identify(cell)?;
        let file = output_dir.join(output::card_file_name(
            index,
            format_extension(cell_info.format),
        ));
        std::fs::write(&file, cell)?;
        cards.push(CardEntry {
            index,
            row: index as u32 / sizing.columns(),
            column: index as u32 % sizing.columns(),
            file,
            width: cell_info.dimensions.width,
            height: cell_info.dimensions.height,
        });
    }

    Ok(CropReport {
        source: board_path.to_path_buf(),
        format: format_name(info.format),
        width: info.dimensions.width,
        height: info.dimensions.height,
        columns: sizing.columns(),
        rows: sizing.rows(),
        cards,
    })
}

fn resize_command(
    board_paths: &[PathBuf],
    reduction: Reduction,
    output_dir: &Path,
    engine_config: &EngineConfig,
) -> Result<Vec<ResizeEntry>, Box<dyn std::error::Error>> {
    let targets = plan_output_paths(board_paths, output_dir)?;
    let backend = RustBackend::new();
    // Files carry no grid; a single cell keeps the board valid.
    let sizing = Sizing::new(1, 1)?;
    let boards = board_paths
        .iter()
        .map(|path| Ok(Board::new(sizing, std::fs::read(path)?)))
        .collect::<Result<Vec<_>, std::io::Error>>()?;

    let resized = resize::resize_boards_with_backend(
        &backend,
        &boards,
        reduction,
        &ResizeConfig::from_engine_config(engine_config),
    )?;

    std::fs::create_dir_all(output_dir)?;
    let mut entries = Vec::with_capacity(resized.len());
    for (((path, target), before), after) in board_paths
        .iter()
        .zip(targets)
        .zip(&boards)
        .zip(&resized)
    {
        std::fs::write(&target, after.image())?;
        entries.push(ResizeEntry {
            source: path.clone(),
            output: target,
            from: backend.identify(before.image())?.dimensions.as_tuple(),
            to: backend.identify(after.image())?.dimensions.as_tuple(),
        });
    }
    Ok(entries)
}

/// Output path for each board: its own file name inside `output_dir`.
///
/// Fails before anything is written if two boards share a file name or a
/// target is the board's own source file.
fn plan_output_paths(
    board_paths: &[PathBuf],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(board_paths.len());
    for path in board_paths {
        let name = path
            .file_name()
            .ok_or_else(|| format!("not a file: {}", path.display()))?;
        if !seen.insert(name.to_os_string()) {
            return Err(format!(
                "duplicate output file name {}: rename one of the boards",
                name.to_string_lossy()
            )
            .into());
        }
        let target = output_dir.join(name);
        match (path.canonicalize(), target.canonicalize()) {
            (Ok(source), Ok(existing)) if source == existing => {
                return Err(format!(
                    "output {} would overwrite its source; choose another --output",
                    target.display()
                )
                .into());
            }
            _ => {}
        }
        targets.push(target);
    }
    Ok(targets)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Never more threads than available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
