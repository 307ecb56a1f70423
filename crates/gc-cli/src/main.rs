mod render;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gc_core::{Direction, Game, GridPoint, LatLng};
use gc_store::SlotStore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rmcp::{ServiceExt, transport::stdio};

use crate::render::{TextRenderer, inventory_text, status_line};

#[derive(Parser)]
#[command(name = "geocache", about = "Grid geocaching game CLI and MCP server")]
struct Cli {
    /// Save slot to play in
    #[arg(long, global = true)]
    slot: Option<String>,

    /// Storage directory (overrides GEOCACHE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// Show the player and every cache in range
    Look,

    /// Step one tile
    Move {
        /// north, south, east or west
        direction: Direction,
    },

    /// Jump to a latitude/longitude
    Goto {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Take a random token from the cache at cell i,j
    Collect {
        #[arg(allow_negative_numbers = true)]
        i: i32,
        #[arg(allow_negative_numbers = true)]
        j: i32,
    },

    /// Drop a random inventory token into the cache at cell i,j
    Deposit {
        #[arg(allow_negative_numbers = true)]
        i: i32,
        #[arg(allow_negative_numbers = true)]
        j: i32,
    },

    /// List carried tokens
    Inventory,

    /// Export the save to a JSON file
    Export {
        /// Output file path
        path: PathBuf,
    },

    /// Replace the save with a JSON file
    Import {
        /// Input file path
        path: PathBuf,
    },
}

fn open_slot(cli: &Cli) -> Result<SlotStore> {
    let base_dir = cli.data_dir.clone().or_else(|| {
        std::env::var("GEOCACHE_DATA_DIR")
            .ok()
            .map(PathBuf::from)
    });
    SlotStore::open(cli.slot.as_deref(), base_dir.as_deref()).context("failed to open save slot")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Serve => cmd_serve(&cli).await,
        Commands::Look => cmd_look(&cli),
        Commands::Move { direction } => cmd_move(&cli, *direction),
        Commands::Goto { lat, lng } => cmd_goto(&cli, *lat, *lng),
        Commands::Collect { i, j } => cmd_collect(&cli, GridPoint::new(*i, *j)),
        Commands::Deposit { i, j } => cmd_deposit(&cli, GridPoint::new(*i, *j)),
        Commands::Inventory => cmd_inventory(&cli),
        Commands::Export { path } => cmd_export(&cli, path),
        Commands::Import { path } => cmd_import(&cli, path),
    }
}

/// Load the slot, letting `renderer` see the restored neighborhood.
fn load(cli: &Cli, renderer: &mut TextRenderer) -> Result<(SlotStore, Game)> {
    let slot = open_slot(cli)?;
    let game = slot.load_game(renderer).context("failed to load game")?;
    Ok((slot, game))
}

fn save(slot: &SlotStore, game: &Game) -> Result<()> {
    slot.save_game(game).context("failed to save game")
}

fn print_world(game: &Game, renderer: TextRenderer) {
    println!("{}", status_line(game));
    if renderer.lines().is_empty() {
        println!("(no caches in range)");
    } else {
        println!("{}", renderer.into_text());
    }
}

async fn cmd_serve(cli: &Cli) -> Result<()> {
    let slot = open_slot(cli)?;
    tracing::info!("starting MCP server for slot '{}'", slot.slot());

    let server = server::GeocacheServer::new(slot).map_err(|e| anyhow::anyhow!("{e}"))?;
    let outcome = match server.clone().serve(stdio()).await {
        Ok(service) => service
            .waiting()
            .await
            .map(|reason| tracing::info!("MCP session ended: {reason:?}"))
            .context("MCP server task failed"),
        Err(e) => {
            // stdin closed before initialize: nothing to serve
            tracing::debug!("client left before the MCP handshake: {e}");
            Ok(())
        }
    };

    server.checkpoint_wal().await;
    outcome
}

fn cmd_look(cli: &Cli) -> Result<()> {
    let mut renderer = TextRenderer::new();
    let (slot, game) = load(cli, &mut renderer)?;
    // a fresh slot has nothing on disk until the first save
    save(&slot, &game)?;
    print_world(&game, renderer);
    Ok(())
}

fn cmd_move(cli: &Cli, direction: Direction) -> Result<()> {
    let mut renderer = TextRenderer::new();
    let (slot, mut game) = load(cli, &mut renderer)?;
    let report = game.move_player(direction, &mut renderer);
    save(&slot, &game)?;

    if cli.verbose {
        eprintln!(
            "--- refresh: evicted={}, restored={}, generated={} ---",
            report.evicted, report.restored, report.generated
        );
    }
    print_world(&game, renderer);
    Ok(())
}

fn cmd_goto(cli: &Cli, lat: f64, lng: f64) -> Result<()> {
    let target = LatLng::new(lat, lng);
    target.validate().map_err(anyhow::Error::msg)?;

    let mut renderer = TextRenderer::new();
    let (slot, mut game) = load(cli, &mut renderer)?;
    game.teleport(target, &mut renderer);
    save(&slot, &game)?;
    print_world(&game, renderer);
    Ok(())
}

fn cmd_collect(cli: &Cli, point: GridPoint) -> Result<()> {
    let mut renderer = TextRenderer::new();
    let (slot, mut game) = load(cli, &mut renderer)?;
    let mut rng = SmallRng::from_os_rng();

    match game.collect(point, &mut rng) {
        Some(token) => {
            save(&slot, &game)?;
            let left = game.cache(point).map_or(0, |c| c.token_count());
            println!("collected {token} from {}:{} ({left} left)", point.i, point.j);
        }
        None => match game.cache(point) {
            Some(_) => println!("cache {}:{} is empty", point.i, point.j),
            None => println!("no cache in range at {}:{}", point.i, point.j),
        },
    }
    Ok(())
}

fn cmd_deposit(cli: &Cli, point: GridPoint) -> Result<()> {
    let mut renderer = TextRenderer::new();
    let (slot, mut game) = load(cli, &mut renderer)?;
    let mut rng = SmallRng::from_os_rng();

    match game.deposit(point, &mut rng) {
        Some(token) => {
            save(&slot, &game)?;
            let held = game.cache(point).map_or(0, |c| c.token_count());
            println!("deposited {token} into {}:{} ({held} held)", point.i, point.j);
        }
        None if game.cache(point).is_none() => {
            println!("no cache in range at {}:{}", point.i, point.j)
        }
        None => println!("nothing to deposit"),
    }
    Ok(())
}

fn cmd_inventory(cli: &Cli) -> Result<()> {
    let (_slot, game) = load(cli, &mut TextRenderer::new())?;
    println!("{}", inventory_text(game.inventory()));
    Ok(())
}

fn cmd_export(cli: &Cli, path: &Path) -> Result<()> {
    let (slot, game) = load(cli, &mut TextRenderer::new())?;
    save(&slot, &game)?;
    slot.export_json_file(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("exported to {}", path.display());
    Ok(())
}

fn cmd_import(cli: &Cli, path: &Path) -> Result<()> {
    let slot = open_slot(cli)?;
    slot.import_json_file(path)
        .context("failed to import JSON")?;

    let game = slot
        .load_game(&mut ())
        .context("failed to load game after import")?;
    save(&slot, &game)?;

    println!("imported from {}. {}", path.display(), status_line(&game));
    Ok(())
}
