use gc_core::{Cache, CacheObserver, Game, GridPoint, Inventory};

/// Text stand-in for the map: one line per visible cache.
#[derive(Debug, Default)]
pub struct TextRenderer {
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_text(self) -> String {
        self.lines.join("\n")
    }
}

impl CacheObserver for TextRenderer {
    fn on_neighborhood_cleared(&mut self) {
        self.lines.clear();
    }

    fn on_cache_spawned(&mut self, point: GridPoint, cache: &Cache) {
        self.lines.push(cache_line(point, cache));
    }
}

pub fn cache_line(point: GridPoint, cache: &Cache) -> String {
    format!(
        "cache {}:{}  {} token{}",
        point.i,
        point.j,
        cache.token_count(),
        if cache.token_count() == 1 { "" } else { "s" }
    )
}

pub fn inventory_text(inventory: &Inventory) -> String {
    if inventory.is_empty() {
        return "No tokens".to_string();
    }
    inventory
        .tokens()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn status_line(game: &Game) -> String {
    let cell = game.player_cell();
    format!(
        "player at {} (cell {}:{}), {} caches in range, carrying {}",
        game.position(),
        cell.i,
        cell.j,
        game.board().active_count(),
        game.inventory().len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_core::{GameConfig, Token};

    #[test]
    fn test_renderer_replaces_lines_on_refresh() {
        let mut game = Game::new(GameConfig::default());
        let mut renderer = TextRenderer::new();
        game.refresh(&mut renderer);
        assert_eq!(renderer.lines().len(), 33);
        assert_eq!(renderer.lines()[0], "cache -8:-5  7 tokens");

        game.move_player(gc_core::Direction::East, &mut renderer);
        assert_eq!(renderer.lines().len(), 33);
        game.move_player(gc_core::Direction::North, &mut renderer);
        // now centered on (1,1)
        assert_eq!(renderer.lines().len(), 32);
    }

    #[test]
    fn test_cache_line_singular() {
        let p = GridPoint::new(7, 4);
        let cache = Cache::new(p, vec![Token::new(p, 0)]);
        assert_eq!(cache_line(p, &cache), "cache 7:4  1 token");
    }

    #[test]
    fn test_inventory_text() {
        assert_eq!(inventory_text(&Inventory::new()), "No tokens");
        let inv: Inventory = vec![
            Token::new(GridPoint::new(3, -2), 0),
            Token::new(GridPoint::new(0, 1), 4),
        ]
        .into_iter()
        .collect();
        assert_eq!(inventory_text(&inv), "3:-2#0\n0:1#4");
    }
}
