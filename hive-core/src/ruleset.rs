//! RuleSet - game configuration stored as JSON

use crate::game::{GameState, NoMoveRule};
use crate::pieces::{BagComposition, Color};
use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How one color is driven
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSetup {
    pub automated: bool,
    pub search_depth: Option<u32>,
}

impl PlayerSetup {
    pub fn human() -> Self {
        Self::default()
    }

    pub fn automated(search_depth: Option<u32>) -> Self {
        Self {
            automated: true,
            search_depth,
        }
    }
}

/// Everything needed to start a game. Missing fields fall back to the
/// standard game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub name: String,
    pub bag: BagComposition,
    pub black: PlayerSetup,
    pub white: PlayerSetup,
    pub first_player: Color,
    pub no_move_rule: NoMoveRule,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            bag: BagComposition::default(),
            black: PlayerSetup::human(),
            white: PlayerSetup::human(),
            first_player: Color::Black,
            no_move_rule: NoMoveRule::Pass,
        }
    }
}

impl RuleSet {
    pub fn setup(&self, color: Color) -> &PlayerSetup {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    fn build_player(&self, color: Color) -> Player {
        let mut player = Player::with_bag(color, &self.bag);
        let setup = self.setup(color);
        player.automated = setup.automated;
        player.search_depth = setup.search_depth;
        player
    }

    /// Convert to GameState
    pub fn to_game_state(&self) -> GameState {
        GameState::with_rules(
            self.build_player(Color::Black),
            self.build_player(Color::White),
            self.first_player,
            self.no_move_rule,
        )
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let ruleset: RuleSet = serde_json::from_str(content)?;
        // Win detection tracks exactly one queen per color
        anyhow::ensure!(
            ruleset.bag.queen == 1,
            "rule set {:?} must give each color exactly one queen, found {}",
            ruleset.name,
            ruleset.bag.queen
        );
        Ok(ruleset)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
