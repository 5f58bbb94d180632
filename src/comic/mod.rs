//! Comic domain: seeded panel generation and the recent-panel history.

use bevy::prelude::*;
use rand::Rng;
use std::collections::VecDeque;

use crate::shared::*;

pub mod config;
pub mod generator;
pub mod scene;

pub use config::{ComicPanelConfig, NarrativeSelection};
pub use generator::{ComicConfigError, GeneratedComicPanel, PanelGenerator};
pub use scene::SceneDescription;

pub const PANEL_HISTORY_LIMIT: usize = 5;

/// Ask for a new panel. `seed: None` draws a fresh seed.
#[derive(Event, Debug, Clone, Default)]
pub struct GenerateComicPanelEvent {
    pub context: String,
    pub seed: Option<u64>,
    /// Keep the theme of the most recent panel.
    pub continue_story: bool,
}

#[derive(Event, Debug, Clone)]
pub struct DeletePanelEvent {
    pub panel_id: String,
}

/// The generator built from the loaded `ComicPanelConfig`.
#[derive(Resource, Debug, Clone)]
pub struct ComicGenerator(pub PanelGenerator);

impl Default for ComicGenerator {
    fn default() -> Self {
        Self(PanelGenerator::standard())
    }
}

/// Most recent first, at most `PANEL_HISTORY_LIMIT` panels.
#[derive(Resource, Debug, Clone, Default)]
pub struct PanelHistory {
    panels: VecDeque<GeneratedComicPanel>,
}

impl PanelHistory {
    pub fn push(&mut self, panel: GeneratedComicPanel) {
        self.panels.push_front(panel);
        self.panels.truncate(PANEL_HISTORY_LIMIT);
    }

    pub fn latest(&self) -> Option<&GeneratedComicPanel> {
        self.panels.front()
    }

    /// Returns whether a panel with that id was present.
    pub fn delete(&mut self, panel_id: &str) -> bool {
        let before = self.panels.len();
        self.panels.retain(|p| p.id != panel_id);
        self.panels.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedComicPanel> {
        self.panels.iter()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

pub struct ComicPlugin;

impl Plugin for ComicPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ComicGenerator>()
            .init_resource::<PanelHistory>()
            .add_event::<GenerateComicPanelEvent>()
            .add_event::<DeletePanelEvent>()
            .add_systems(OnEnter(GameState::Playing), build_generator)
            .add_systems(
                Update,
                (handle_generate_requests, handle_delete_requests)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Rebuilds the generator from the loaded config. A missing or unusable
/// config keeps the built-in generator.
pub fn build_generator(
    config: Option<Res<ComicPanelConfig>>,
    mut generator: ResMut<ComicGenerator>,
) {
    let Some(config) = config else {
        return;
    };
    match PanelGenerator::new(config.clone()) {
        Ok(built) => generator.0 = built,
        Err(e) => warn!("[Comic] Config rejected ({}); using built-in panel config", e),
    }
}

pub fn handle_generate_requests(
    mut requests: EventReader<GenerateComicPanelEvent>,
    generator: Res<ComicGenerator>,
    mut history: ResMut<PanelHistory>,
    mut generated: EventWriter<ComicPanelGeneratedEvent>,
) {
    for ev in requests.read() {
        let seed = ev.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let previous = if ev.continue_story { history.latest() } else { None };
        let panel = generator.0.generate_with_context(previous, &ev.context, seed);

        debug!("[Comic] Generated panel {} from seed {}", panel.id, seed);
        generated.send(ComicPanelGeneratedEvent {
            panel_id: panel.id.clone(),
            seed,
        });
        history.push(panel);
    }
}

pub fn handle_delete_requests(
    mut requests: EventReader<DeletePanelEvent>,
    mut history: ResMut<PanelHistory>,
) {
    for ev in requests.read() {
        if !history.delete(&ev.panel_id) {
            debug!("[Comic] No panel '{}' to delete", ev.panel_id);
        }
    }
}
