//! Sonar log viewer.
//!
//! Opens a Humminbird recording and drives a viewport session over it:
//! - `view` scripts layout, scrolling and pointer input, writing every
//!   rendered tile as a PNG
//! - `info` prints the header of one recording
//! - `list` finds recordings below a directory

mod config;
mod source;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use renderer::TileRenderer;
use sonar_common::{ChannelKind, Palette};
use sonar_log::{read_header, HumminbirdLog, LogHeader, SonarSource};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use viewport::{
    FetchError, Readout, RulerOverlay, ScreenOrigin, ViewportController, ViewportObserver,
    ViewportSession,
};
use walkdir::WalkDir;

use config::ViewerConfig;
use source::LogTileSource;

#[derive(Parser, Debug)]
#[command(name = "sonar-viewer")]
#[command(about = "Render and inspect Humminbird sonar recordings")]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted viewport session and write the rendered tiles
    View(ViewArgs),

    /// Print the header and ping count of a recording
    Info {
        /// Path to the .DAT file
        dat: PathBuf,

        /// Sonar channel to count
        #[arg(long, default_value = "traditional")]
        channel: ChannelKind,
    },

    /// List recordings below a directory
    List {
        /// Directory to search
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Path to the .DAT file
    dat: PathBuf,

    /// Sonar channel to display
    #[arg(long, default_value = "traditional")]
    channel: ChannelKind,

    /// Scroll positions applied in order, e.g. `0,450,1200`
    #[arg(long, value_delimiter = ',', default_value = "0")]
    scroll: Vec<u32>,

    /// Pointer position `x,y` reported after the last scroll
    #[arg(long, value_parser = parse_point)]
    pointer: Option<(i32, i32)>,

    /// YAML configuration file
    #[arg(long, env = "SONAR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for rendered tiles
    #[arg(long)]
    output: Option<PathBuf>,

    /// Color palette
    #[arg(long)]
    palette: Option<Palette>,

    /// Depth range in meters, 0 for auto-range
    #[arg(long)]
    range: Option<f32>,

    /// Tile width in pixels
    #[arg(long)]
    tile_width: Option<u32>,
}

fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y = y.trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    Ok((x, y))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    match cli.command {
        Commands::View(args) => view(args).await,
        Commands::Info { dat, channel } => print_info(&dat, channel),
        Commands::List { dir } => list(&dir),
    }
}

fn load_config(args: &ViewArgs) -> Result<ViewerConfig> {
    let config = match &args.config {
        Some(path) => ViewerConfig::from_yaml(path)?,
        None => ViewerConfig::default(),
    };
    let mut config = config.with_env();

    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(palette) = args.palette {
        config.palette = palette;
    }
    if let Some(range) = args.range {
        config.range = range;
    }
    if let Some(tile_width) = args.tile_width {
        config.tile_width = tile_width;
    }

    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

async fn view(args: ViewArgs) -> Result<()> {
    let config = load_config(&args)?;
    info!(config = ?config, "Starting viewer");

    let log = HumminbirdLog::open(&args.dat, args.channel)?;
    info!(
        name = %log.header().name,
        channel = %log.channel(),
        pings = log.len(),
        "Opened recording"
    );
    let log: Arc<dyn SonarSource> = Arc::new(log);

    tokio::fs::create_dir_all(&config.output_dir).await?;

    let source = LogTileSource::new(log);
    let total_width = source.total_width();
    let options = config.display_options(args.channel == ChannelKind::SideScan);

    let mut controller = ViewportController::new(config.tile_width, options);
    controller.set_click_listener(|x| info!(x, "Clicked"));

    let writer = TileWriter::new(config.output_dir.clone());
    let (session, handle) = ViewportSession::new(controller, Arc::new(source), writer);
    let task = tokio::spawn(session.run());

    handle.initialize(total_width)?;
    handle.layout(
        config.viewport_width,
        config.viewport_height,
        ScreenOrigin::default(),
    )?;
    handle.wait_idle().await?;

    for scroll in &args.scroll {
        handle.scroll(*scroll)?;
        handle.wait_idle().await?;
    }

    if let Some((x, y)) = args.pointer {
        handle.pointer_move(x, y)?;
    }

    handle.shutdown()?;
    let (controller, writer) = task.await?;

    info!(
        tiles = controller.tiles().len(),
        written = writer.written,
        failed = ?controller.failed_tiles(),
        output_dir = %config.output_dir.display(),
        "Viewer finished"
    );

    if writer.write_errors > 0 {
        return Err(anyhow!("{} tiles could not be written", writer.write_errors));
    }
    Ok(())
}

/// Writes every rendered tile to `tile_<start>.png` and prints readouts.
struct TileWriter {
    output_dir: PathBuf,
    written: usize,
    write_errors: usize,
}

impl TileWriter {
    fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            written: 0,
            write_errors: 0,
        }
    }

    fn write_tile(&self, tile: &TileRenderer) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("tile_{}.png", tile.start()));
        let png = tile.encode_png()?;
        std::fs::write(&path, png)?;
        Ok(path)
    }
}

impl ViewportObserver for TileWriter {
    fn on_readout(&mut self, readout: &Readout, ruler: &RulerOverlay) {
        println!("x={} y={}", readout.x, readout.y);
        for label in readout.labels() {
            println!("  {}", label);
        }
        if let Some(row) = ruler.marker_row {
            println!("  Bottom marker at row {}", row);
        }
    }

    fn on_tile_rendered(&mut self, tile: &TileRenderer) {
        match self.write_tile(tile) {
            Ok(path) => {
                self.written += 1;
                info!(start = tile.start(), path = %path.display(), "Wrote tile");
            }
            Err(e) => {
                self.write_errors += 1;
                error!(start = tile.start(), error = %e, "Failed to write tile");
            }
        }
    }

    fn on_fetch_failed(&mut self, offset: u32, error: &FetchError) {
        warn!(offset, error = %error, "Tile fetch failed");
    }
}

fn print_header(path: &Path, header: &LogHeader) {
    println!("{}", path.display());
    println!("  name:       {}", header.name);
    match header.captured_at() {
        Some(at) => println!("  captured:   {}", at.to_rfc3339()),
        None => println!("  captured:   unknown ({})", header.timestamp),
    }
    println!(
        "  origin:     {:.6}, {:.6}",
        header.origin_latitude(),
        header.origin_longitude()
    );
    println!("  block size: {}", header.block_size);
}

fn print_info(dat: &Path, channel: ChannelKind) -> Result<()> {
    let log = HumminbirdLog::open(dat, channel)?;
    print_header(dat, log.header());
    println!("  channel:    {}", log.channel());
    println!("  pings:      {}", log.len());
    println!("  samples:    {}", log.header().soundings_len());
    Ok(())
}

fn list(dir: &Path) -> Result<()> {
    let mut found = 0;
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let is_dat = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("dat"))
            .unwrap_or(false);
        if !entry.file_type().is_file() || !is_dat {
            continue;
        }

        match read_header(entry.path()) {
            Ok(header) => {
                print_header(entry.path(), &header);
                found += 1;
            }
            Err(e) => warn!(path = %entry.path().display(), error = %e, "Not a sonar log"),
        }
    }

    info!(dir = %dir.display(), found, "Listed recordings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("130,150"), Ok((130, 150)));
        assert_eq!(parse_point(" -5, 20"), Ok((-5, 20)));
        assert!(parse_point("130").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn test_cli_parses_view() {
        let cli = Cli::try_parse_from([
            "sonar-viewer",
            "view",
            "R00012.DAT",
            "--channel",
            "sidescan",
            "--scroll",
            "0,450",
            "--pointer",
            "130,150",
        ])
        .unwrap();

        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.channel, ChannelKind::SideScan);
                assert_eq!(args.scroll, vec![0, 450]);
                assert_eq!(args.pointer, Some((130, 150)));
                assert_eq!(args.dat, PathBuf::from("R00012.DAT"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_channel() {
        let result = Cli::try_parse_from(["sonar-viewer", "info", "R00012.DAT", "--channel", "sonar"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_tile() {
        let dir = tempfile::tempdir().unwrap();
        let pings = test_utils::create_bottom_pings(10, 32, 5.0, 10.0);
        let mut tile = TileRenderer::new(pings, 800, 10, 20, Default::default());
        tile.render();

        let writer = TileWriter::new(dir.path().to_path_buf());
        let path = writer.write_tile(&tile).unwrap();
        assert_eq!(path, dir.path().join("tile_800.png"));
        assert!(path.exists());
    }
}
