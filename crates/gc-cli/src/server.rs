use std::sync::Arc;

use gc_core::{Direction, Game, GridPoint, LatLng, RefreshReport, Token, export_json};
use gc_store::SlotStore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct GeocacheServer {
    state: Arc<Mutex<ServerState>>,
    tool_router: ToolRouter<Self>,
}

struct ServerState {
    game: Game,
    slot: SlotStore,
    rng: SmallRng,
}

impl ServerState {
    /// Save `next` and only then make it the live session, so a failed
    /// save leaves memory and disk in agreement.
    fn commit(&mut self, next: Game) -> Result<(), McpError> {
        self.slot
            .save_game(&next)
            .map_err(|e| McpError::internal_error(format!("failed to save game: {e}"), None))?;
        self.game = next;
        Ok(())
    }
}

impl GeocacheServer {
    pub fn new(slot: SlotStore) -> std::result::Result<Self, String> {
        let game = slot
            .load_game(&mut ())
            .map_err(|e| format!("failed to load game: {e}"))?;
        let rng = SmallRng::from_os_rng();
        Ok(Self {
            state: Arc::new(Mutex::new(ServerState { game, slot, rng })),
            tool_router: Self::tool_router(),
        })
    }

    /// Flush the slot's WAL before the process exits.
    pub async fn checkpoint_wal(&self) {
        let state = self.state.lock().await;
        if let Err(e) = state.slot.store().checkpoint_truncate() {
            tracing::warn!("WAL checkpoint failed: {e}");
        }
    }

    fn look_json(game: &Game) -> serde_json::Value {
        let cell = game.player_cell();
        let caches: Vec<serde_json::Value> = game
            .board()
            .active_caches()
            .map(|c| {
                serde_json::json!({
                    "cell": c.point.key(),
                    "tokens": c.token_count(),
                })
            })
            .collect();
        serde_json::json!({
            "player": {
                "lat": game.position().lat,
                "lng": game.position().lng,
                "cell": cell.key(),
            },
            "caches": caches,
            "inventory": game.inventory().len(),
        })
    }

    fn report_json(report: &RefreshReport) -> serde_json::Value {
        serde_json::json!({
            "evicted": report.evicted,
            "restored": report.restored,
            "generated": report.generated,
        })
    }

    fn transfer_json(game: &Game, point: GridPoint, moved: Option<Token>) -> serde_json::Value {
        serde_json::json!({
            "moved": moved.map(|t| t.to_string()),
            "cache": point.key(),
            "cache_tokens": game.cache(point).map(|c| c.token_count()),
            "inventory": game.inventory().len(),
        })
    }

    fn json_result(value: &serde_json::Value) -> CallToolResult {
        CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(value).unwrap_or_default(),
        )])
    }
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct MoveRequest {
    /// One of north, south, east, west (or n, s, e, w)
    direction: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GotoRequest {
    /// Latitude in degrees
    lat: f64,
    /// Longitude in degrees
    lng: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CellRequest {
    /// Cell row (latitude tiles from the spawn point)
    i: i32,
    /// Cell column (longitude tiles from the spawn point)
    j: i32,
}

#[tool_router]
impl GeocacheServer {
    #[tool(
        description = "Describe the player's surroundings: position, grid cell, every cache in range with its token count, and how many tokens the player carries."
    )]
    async fn gc_look(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        Ok(Self::json_result(&Self::look_json(&state.game)))
    }

    #[tool(description = "Move the player one tile north, south, east or west. Caches left behind are remembered exactly as they were.")]
    async fn gc_move(
        &self,
        Parameters(req): Parameters<MoveRequest>,
    ) -> Result<CallToolResult, McpError> {
        let direction: Direction = req
            .direction
            .parse()
            .map_err(|e: String| McpError::invalid_params(e, None))?;

        let mut state = self.state.lock().await;
        let mut next = state.game.clone();
        let report = next.move_player(direction, &mut ());
        state.commit(next)?;
        tracing::debug!("moved {direction}: {report:?}");

        let mut out = Self::look_json(&state.game);
        out["refresh"] = Self::report_json(&report);
        Ok(Self::json_result(&out))
    }

    #[tool(description = "Jump the player to a latitude/longitude, as a geolocation fix would.")]
    async fn gc_goto(
        &self,
        Parameters(req): Parameters<GotoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let target = LatLng::new(req.lat, req.lng);
        target
            .validate()
            .map_err(|e| McpError::invalid_params(e, None))?;

        let mut state = self.state.lock().await;
        let mut next = state.game.clone();
        let report = next.teleport(target, &mut ());
        state.commit(next)?;

        let mut out = Self::look_json(&state.game);
        out["refresh"] = Self::report_json(&report);
        Ok(Self::json_result(&out))
    }

    #[tool(description = "Take a random token from the cache at cell (i, j) into the inventory. Does nothing if no cache is in range there or it is empty.")]
    async fn gc_collect(
        &self,
        Parameters(req): Parameters<CellRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let point = GridPoint::new(req.i, req.j);
        let mut next = state.game.clone();
        let moved = next.collect(point, &mut state.rng);
        if moved.is_some() {
            state.commit(next)?;
        }
        Ok(Self::json_result(&Self::transfer_json(&state.game, point, moved)))
    }

    #[tool(description = "Drop a random inventory token into the cache at cell (i, j). Does nothing if no cache is in range there or the inventory is empty.")]
    async fn gc_deposit(
        &self,
        Parameters(req): Parameters<CellRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state.lock().await;
        let point = GridPoint::new(req.i, req.j);
        let mut next = state.game.clone();
        let moved = next.deposit(point, &mut state.rng);
        if moved.is_some() {
            state.commit(next)?;
        }
        Ok(Self::json_result(&Self::transfer_json(&state.game, point, moved)))
    }

    #[tool(description = "List the tokens the player carries, as origin i:j#serial.")]
    async fn gc_inventory(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let tokens: Vec<String> = state
            .game
            .inventory()
            .tokens()
            .iter()
            .map(|t| t.to_string())
            .collect();
        Ok(Self::json_result(&serde_json::json!({ "tokens": tokens })))
    }

    #[tool(description = "Export the whole save (player, inventory, remembered caches) as JSON.")]
    async fn gc_export(&self) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let json = export_json(&state.game.snapshot())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for GeocacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "You are playing a geocaching game on a grid of map cells.\n\n\
                 - Call gc_look to see nearby caches. Cells are named i,j.\n\
                 - Call gc_move to walk one tile, or gc_goto to jump to coordinates.\n\
                 - Call gc_collect / gc_deposit with a cell in range to move a random token.\n\
                 - Caches you walk away from keep their contents until you come back."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
