//! Data layer: game tuning loaded at startup.
//!
//! Runs in OnEnter(GameState::Loading), parses the RON documents embedded from
//! `assets/config/` into `FarmConfig` and `ComicPanelConfig`, then moves the
//! game into GameState::Playing. A config resource inserted before the app
//! starts is left alone, which is how embedders pick a preset.

use bevy::prelude::*;
use thiserror::Error;

use crate::comic::ComicPanelConfig;
use crate::shared::*;

const FARM_RON: &str = include_str!("../../assets/config/farm.ron");
const COMIC_RON: &str = include_str!("../../assets/config/comic.ron");

/// Upper bound on `rows * cols` for a configured farm.
pub const MAX_FARM_CELLS: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn parse_farm_config(source: &str) -> Result<FarmConfig, ConfigError> {
    let config: FarmConfig = ron::from_str(source)?;
    let cells = config.rows.checked_mul(config.cols).unwrap_or(usize::MAX);
    if cells == 0 || cells > MAX_FARM_CELLS {
        return Err(ConfigError::Invalid(format!(
            "grid must hold 1..={} cells ({}x{})",
            MAX_FARM_CELLS, config.rows, config.cols
        )));
    }
    for crop in CropType::ALL {
        match config.economy.get(crop) {
            Some(e) if e.seed_cost > 0 && e.harvest_reward > 0 => {}
            Some(_) => {
                return Err(ConfigError::Invalid(format!("{:?} prices must be positive", crop)));
            }
            None => return Err(ConfigError::Invalid(format!("no prices for {:?}", crop))),
        }
    }
    Ok(config)
}

pub fn parse_comic_config(source: &str) -> Result<ComicPanelConfig, ConfigError> {
    Ok(ron::from_str(source)?)
}

/// Embedded farm config, or the compiled-in standard preset if it is unusable.
pub fn load_farm_config() -> FarmConfig {
    parse_farm_config(FARM_RON).unwrap_or_else(|e| {
        warn!("[Data] farm.ron rejected ({}); using built-in defaults", e);
        FarmConfig::standard()
    })
}

pub fn load_comic_config() -> ComicPanelConfig {
    parse_comic_config(COMIC_RON).unwrap_or_else(|e| {
        warn!("[Data] comic.ron rejected ({}); using built-in defaults", e);
        ComicPanelConfig::default()
    })
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

fn load_all_data(
    mut commands: Commands,
    farm_config: Option<Res<FarmConfig>>,
    comic_config: Option<Res<ComicPanelConfig>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] Loading configuration...");

    if farm_config.is_none() {
        let config = load_farm_config();
        info!(
            "  Farm: {}x{}, {} money, seed returned on harvest: {}, planting costs money: {}",
            config.rows,
            config.cols,
            config.starting_money,
            config.policy.harvest_returns_seed,
            config.policy.planting_costs_money
        );
        commands.insert_resource(config);
    }

    if comic_config.is_none() {
        let config = load_comic_config();
        info!(
            "  Comic: {} layouts, {} bubble styles",
            config.template_components.panel_layouts.len(),
            config.template_components.speech_bubble_styles.len()
        );
        commands.insert_resource(config);
    }

    next_state.set(GameState::Playing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comic::PanelGenerator;

    #[test]
    fn test_embedded_farm_config_is_standard_preset() {
        assert_eq!(parse_farm_config(FARM_RON).unwrap(), FarmConfig::standard());
    }

    #[test]
    fn test_embedded_comic_config_builds_a_generator() {
        let config = parse_comic_config(COMIC_RON).unwrap();
        assert_eq!(config.template_components.panel_layouts.len(), 3);
        assert!(PanelGenerator::new(config).is_ok());
    }

    #[test]
    fn test_bad_farm_config_is_rejected() {
        assert!(matches!(parse_farm_config("(rows: 5"), Err(ConfigError::Parse(_))));

        let empty_grid = FARM_RON.replace("rows: 5", "rows: 0");
        assert!(matches!(parse_farm_config(&empty_grid), Err(ConfigError::Invalid(_))));

        let huge_grid = FARM_RON.replace("rows: 5", &format!("rows: {}", usize::MAX));
        assert!(matches!(parse_farm_config(&huge_grid), Err(ConfigError::Invalid(_))));

        let free_corn = FARM_RON.replace("seed_cost: 6", "seed_cost: 0");
        assert!(matches!(parse_farm_config(&free_corn), Err(ConfigError::Invalid(_))));
    }
}
