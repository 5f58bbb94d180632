use bevy::prelude::*;
use crate::shared::*;

pub struct TutorialStep {
    pub title: &'static str,
    pub content: &'static str,
    pub image: &'static str,
}

pub const TUTORIAL_STEPS: &[TutorialStep] = &[
    TutorialStep {
        title: "Welcome to Farming Comic Game!",
        content: "Learn the basics of farming, managing your resources, and creating your own comic story.",
        image: "tutorial/welcome.png",
    },
    TutorialStep {
        title: "Understanding the Farm Grid",
        content: "Each grid cell represents a plot where you can plant crops. Click on a cell to start planting!",
        image: "tutorial/farm-grid.png",
    },
    TutorialStep {
        title: "Crop Management",
        content: "Different crops have different growth times and values. Watch them grow and harvest at the right moment!",
        image: "tutorial/crop-management.png",
    },
    TutorialStep {
        title: "Comic Panel Creation",
        content: "As you progress, you can create comic panels that tell the story of your farm adventure.",
        image: "tutorial/comic-panel.png",
    },
];

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TutorialState {
    pub step: usize,
    pub completed: bool,
}

impl TutorialState {
    pub fn current(&self) -> &'static TutorialStep {
        &TUTORIAL_STEPS[self.step.min(TUTORIAL_STEPS.len() - 1)]
    }

    /// Advances one step. On the last step marks the tutorial complete and
    /// returns true the first time that happens.
    pub fn next(&mut self) -> bool {
        if self.step + 1 < TUTORIAL_STEPS.len() {
            self.step += 1;
            false
        } else {
            let newly = !self.completed;
            self.completed = true;
            newly
        }
    }

    pub fn previous(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    pub fn restart(&mut self) {
        *self = Self::default();
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialNavEvent {
    Next,
    Previous,
    Restart,
}

#[derive(Event, Debug, Clone, Default)]
pub struct TutorialCompletedEvent;

pub struct TutorialPlugin;

impl Plugin for TutorialPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TutorialState>()
            .add_event::<TutorialNavEvent>()
            .add_event::<TutorialCompletedEvent>()
            .add_systems(Update, handle_tutorial_nav.run_if(in_state(GameState::Playing)));
    }
}

pub fn handle_tutorial_nav(
    mut events: EventReader<TutorialNavEvent>,
    mut tutorial: ResMut<TutorialState>,
    mut completed: EventWriter<TutorialCompletedEvent>,
) {
    for ev in events.read() {
        match ev {
            TutorialNavEvent::Next => {
                if tutorial.next() {
                    info!("[Tutorial] Completed");
                    completed.send(TutorialCompletedEvent);
                }
            }
            TutorialNavEvent::Previous => tutorial.previous(),
            TutorialNavEvent::Restart => tutorial.restart(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_through_all_steps() {
        let mut t = TutorialState::default();
        assert_eq!(t.current().title, "Welcome to Farming Comic Game!");
        for _ in 0..3 {
            assert!(!t.next());
        }
        assert_eq!(t.step, 3);
        assert!(!t.completed);
        assert!(t.next());
        assert!(t.completed);
        assert_eq!(t.step, 3);
        assert!(!t.next());
    }

    #[test]
    fn test_previous_stops_at_first_step() {
        let mut t = TutorialState::default();
        t.previous();
        assert_eq!(t.step, 0);
        t.next();
        t.previous();
        assert_eq!(t.step, 0);
    }

    #[test]
    fn test_restart() {
        let mut t = TutorialState { step: 3, completed: true };
        t.restart();
        assert_eq!(t, TutorialState::default());
    }
}
