use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::*;
use super::scene::SceneDescription;
use crate::shared::current_timestamp_millis;

/// Colors a panel palette is cut from. A panel takes a prefix of 2 to 5.
pub const BASE_PALETTE: [&str; 5] = ["#FFC300", "#DAF7A6", "#FF5733", "#C70039", "#900C3F"];
pub const MIN_PALETTE_LEN: usize = 2;

const DIALOGUE_TEMPLATES: [&str; 3] = [
    "A typical farming day begins...",
    "Hmm, something interesting is happening...",
    "Just another adventure in the comic farm!",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelStyle {
    pub color_palette: Vec<String>,
    pub speech_bubble_style: SpeechBubbleStyle,
    pub narrative_style: NarrativeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMetadata {
    /// Milliseconds since the Unix epoch.
    pub generation_timestamp: u64,
    pub variation_seed: u64,
}

/// One generated panel. Never mutated after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedComicPanel {
    pub id: String,
    pub layout: PanelLayout,
    pub dialogue: Vec<String>,
    pub style: PanelStyle,
    pub scene: SceneDescription,
    pub metadata: PanelMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComicConfigError {
    #[error("no panel layouts configured")]
    NoLayouts,
    #[error("no speech bubble styles configured")]
    NoBubbleStyles,
    #[error("narrative styles are drawn from config but none are configured")]
    NoNarrativeStyles,
}

/// Produces panels from a fixed config. Every draw comes from a `StdRng`
/// seeded with the panel's variation seed, so a seed reproduces its panel.
#[derive(Debug, Clone)]
pub struct PanelGenerator {
    config: ComicPanelConfig,
}

impl PanelGenerator {
    pub fn new(config: ComicPanelConfig) -> Result<Self, ComicConfigError> {
        let parts = &config.template_components;
        if parts.panel_layouts.is_empty() {
            return Err(ComicConfigError::NoLayouts);
        }
        if parts.speech_bubble_styles.is_empty() {
            return Err(ComicConfigError::NoBubbleStyles);
        }
        if config.narrative == NarrativeSelection::FromConfig && parts.narrative_styles.is_empty() {
            return Err(ComicConfigError::NoNarrativeStyles);
        }
        Ok(Self { config })
    }

    /// Generator over the built-in config, which is always usable.
    pub fn standard() -> Self {
        Self {
            config: ComicPanelConfig::default(),
        }
    }

    pub fn config(&self) -> &ComicPanelConfig {
        &self.config
    }

    pub fn generate(&self, context: &str, seed: u64) -> GeneratedComicPanel {
        let mut rng = StdRng::seed_from_u64(seed);
        let parts = &self.config.template_components;

        let mut layout = pick(&mut rng, &parts.panel_layouts).clone();
        layout.style_constraints = vec![
            StyleRule::new(StyleRuleKind::Layout, "grid-based"),
            StyleRule::new(StyleRuleKind::Color, "comic-style-palette"),
        ];

        let template = pick(&mut rng, &DIALOGUE_TEMPLATES);
        let dialogue = vec![format!("{template} {context}")];

        let palette_len = rng.gen_range(MIN_PALETTE_LEN..=BASE_PALETTE.len());
        let color_palette = BASE_PALETTE[..palette_len]
            .iter()
            .map(|c| c.to_string())
            .collect();

        let mut speech_bubble_style = *pick(&mut rng, &parts.speech_bubble_styles);
        speech_bubble_style.tail = TailPosition::Right;

        let narrative_style = match self.config.narrative {
            NarrativeSelection::Fixed => NarrativeStyle::default(),
            NarrativeSelection::FromConfig => *pick(&mut rng, &parts.narrative_styles),
        };

        let scene = SceneDescription::generate(&mut rng);
        let id = panel_id(&mut rng);

        GeneratedComicPanel {
            id,
            layout,
            dialogue,
            style: PanelStyle {
                color_palette,
                speech_bubble_style,
                narrative_style,
            },
            scene,
            metadata: PanelMetadata {
                generation_timestamp: current_timestamp_millis(),
                variation_seed: seed,
            },
        }
    }

    /// `count` panels. Each panel's seed is drawn from a generator seeded with `seed`.
    pub fn generate_series(&self, context: &str, count: usize, seed: u64) -> Vec<GeneratedComicPanel> {
        let mut seeds = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| self.generate(context, seeds.gen()))
            .collect()
    }

    /// Like `generate`, but keeps the previous panel's theme when there is one.
    pub fn generate_with_context(
        &self,
        previous: Option<&GeneratedComicPanel>,
        context: &str,
        seed: u64,
    ) -> GeneratedComicPanel {
        let mut panel = self.generate(context, seed);
        if let Some(prev) = previous {
            panel.scene.theme = prev.scene.theme;
        }
        panel
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// UUID-shaped id built from two draws.
fn panel_id(rng: &mut StdRng) -> String {
    let hi: u64 = rng.gen();
    let lo: u64 = rng.gen();
    format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        hi >> 32,
        (hi >> 16) & 0xffff,
        hi & 0xffff,
        lo >> 48,
        lo & 0xffff_ffff_ffff
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comic::scene::Theme;

    fn generator() -> PanelGenerator {
        PanelGenerator::new(ComicPanelConfig::default()).unwrap()
    }

    fn multi_layout_config() -> ComicPanelConfig {
        let mut config = ComicPanelConfig::default();
        let base = config.template_components.panel_layouts[0].clone();
        for (id, count) in [("wide", 1), ("quad", 4)] {
            config.template_components.panel_layouts.push(PanelLayout {
                id: id.to_string(),
                panel_count: count,
                ..base.clone()
            });
        }
        config
    }

    #[test]
    fn test_same_seed_same_panel() {
        let gen = PanelGenerator::new(multi_layout_config()).unwrap();
        let a = gen.generate("Farming adventure begins", 42);
        let b = gen.generate("Farming adventure begins", 42);
        assert_eq!(a.layout.id, b.layout.id);
        assert_eq!(a.dialogue, b.dialogue);
        assert_eq!(a.id, b.id);
        assert_eq!(a.scene, b.scene);
        assert_eq!(a.metadata.variation_seed, 42);
    }

    #[test]
    fn test_dialogue_templates_the_context() {
        let panel = generator().generate("The corn is ready", 7);
        assert_eq!(panel.dialogue.len(), 1);
        assert!(panel.dialogue[0].ends_with(" The corn is ready"));
        assert!(DIALOGUE_TEMPLATES.iter().any(|t| panel.dialogue[0].starts_with(t)));
    }

    #[test]
    fn test_palette_is_prefix_of_base() {
        let gen = generator();
        let mut lengths = std::collections::HashSet::new();
        for seed in 0..200 {
            let palette = gen.generate("", seed).style.color_palette;
            assert!((MIN_PALETTE_LEN..=BASE_PALETTE.len()).contains(&palette.len()));
            assert_eq!(palette, BASE_PALETTE[..palette.len()]);
            lengths.insert(palette.len());
        }
        assert_eq!(lengths.len(), 4);
    }

    #[test]
    fn test_style_constraints_and_tail_are_pinned() {
        let mut config = ComicPanelConfig::default();
        config.template_components.speech_bubble_styles[0].tail = TailPosition::Left;
        let panel = PanelGenerator::new(config).unwrap().generate("", 3);
        assert_eq!(panel.style.speech_bubble_style.tail, TailPosition::Right);
        assert_eq!(panel.layout.style_constraints.len(), 2);
        assert_eq!(panel.layout.style_constraints[1].rule, "comic-style-palette");
    }

    #[test]
    fn test_fixed_narrative_ignores_config() {
        let mut config = ComicPanelConfig::default();
        config.template_components.narrative_styles = vec![NarrativeStyle {
            genre: Genre::Adventure,
            humor_level: 2,
            pacing: Pacing::Fast,
        }];
        let fixed = PanelGenerator::new(config.clone()).unwrap().generate("", 1);
        assert_eq!(fixed.style.narrative_style, NarrativeStyle::default());

        config.narrative = NarrativeSelection::FromConfig;
        let drawn = PanelGenerator::new(config).unwrap().generate("", 1);
        assert_eq!(drawn.style.narrative_style.genre, Genre::Adventure);
    }

    #[test]
    fn test_empty_config_is_rejected() {
        let mut config = ComicPanelConfig::default();
        config.template_components.speech_bubble_styles.clear();
        assert_eq!(PanelGenerator::new(config.clone()).err(), Some(ComicConfigError::NoBubbleStyles));
        config.template_components.panel_layouts.clear();
        assert_eq!(PanelGenerator::new(config).err(), Some(ComicConfigError::NoLayouts));
    }

    #[test]
    fn test_series_is_reproducible() {
        let gen = generator();
        let a = gen.generate_series("harvest day", 4, 11);
        let b = gen.generate_series("harvest day", 4, 11);
        assert_eq!(a.len(), 4);
        let ids: Vec<_> = a.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, b.iter().map(|p| p.id.clone()).collect::<Vec<_>>());
        assert_ne!(a[0].metadata.variation_seed, a[1].metadata.variation_seed);
    }

    #[test]
    fn test_context_keeps_previous_theme() {
        let gen = generator();
        let mut previous = gen.generate("", 5);
        previous.scene.theme = Theme::Fantasy;
        for seed in 0..20 {
            let next = gen.generate_with_context(Some(&previous), "", seed);
            assert_eq!(next.scene.theme, Theme::Fantasy);
        }
        let fresh = gen.generate_with_context(None, "", 5);
        assert_eq!(fresh.scene, gen.generate("", 5).scene);
    }
}
