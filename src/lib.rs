//! Farming Comic Game: the game logic as a set of Bevy plugins.
//!
//! `GamePlugin` wires the shared resources and events together with every
//! domain plugin. It needs no window or renderer; the embedder supplies the
//! runtime plugins (`MinimalPlugins` or `DefaultPlugins`) and `StatesPlugin`.
//!
//! To pick a storage backend or a farm preset, insert `save::Persistence` or
//! `shared::FarmConfig` before adding `GamePlugin`.

use bevy::prelude::*;

pub mod shared;
pub mod data;
pub mod farming;
pub mod economy;
pub mod comic;
pub mod progression;
pub mod quests;
pub mod tutorial;
pub mod session;
pub mod save;

use shared::*;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            // Game state
            .init_state::<GameState>()
            // Shared resources
            .init_resource::<FarmGrid>()
            .init_resource::<ResourceLedger>()
            .init_resource::<Session>()
            // Farm events
            .add_event::<FarmActionEvent>()
            .add_event::<NewFarmEvent>()
            .add_event::<FarmChangedEvent>()
            .add_event::<CropPlantedEvent>()
            .add_event::<CropWateredEvent>()
            .add_event::<CropHarvestedEvent>()
            .add_event::<LedgerChangedEvent>()
            // Cross-domain events
            .add_event::<TradeCompletedEvent>()
            .add_event::<ComicPanelGeneratedEvent>()
            .add_event::<GainExperienceEvent>()
            .add_event::<AchievementUnlockedEvent>()
            // Persistence requests
            .add_event::<SaveUserProgressEvent>()
            .add_event::<LoadUserProgressEvent>()
            .add_event::<UserProgressSavedEvent>()
            .add_event::<UserProgressLoadedEvent>()
            // Domain plugins
            .add_plugins(farming::FarmingPlugin)
            .add_plugins(economy::EconomyPlugin)
            .add_plugins(comic::ComicPlugin)
            .add_plugins(progression::ProgressionPlugin)
            .add_plugins(quests::QuestsPlugin)
            .add_plugins(tutorial::TutorialPlugin)
            .add_plugins(session::SessionPlugin)
            .add_plugins(save::SavePlugin)
            // Data loading
            .add_plugins(data::DataPlugin);
    }
}
