use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// TEMPLATE COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleRuleKind {
    Layout,
    Color,
    Typography,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    pub kind: StyleRuleKind,
    pub rule: String,
}

impl StyleRule {
    pub fn new(kind: StyleRuleKind, rule: &str) -> Self {
        Self { kind, rule: rule.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelLayout {
    pub id: String,
    pub name: String,
    pub panel_count: u32,
    pub grid_template: String,
    #[serde(default)]
    pub style_constraints: Vec<StyleRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleKind {
    Thought,
    Speech,
    Whisper,
    Shout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleShape {
    Rounded,
    Jagged,
    Cloud,
    Rectangular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailPosition {
    Left,
    Right,
    Center,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechBubbleStyle {
    pub kind: BubbleKind,
    pub shape: BubbleShape,
    pub tail: TailPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Comedy,
    SliceOfLife,
    Adventure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    Slow,
    Moderate,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeStyle {
    pub genre: Genre,
    pub humor_level: u8,
    pub pacing: Pacing,
}

impl Default for NarrativeStyle {
    /// Comedy, humor 7, moderate pacing.
    fn default() -> Self {
        Self {
            genre: Genre::Comedy,
            humor_level: 7,
            pacing: Pacing::Moderate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateComponents {
    pub panel_layouts: Vec<PanelLayout>,
    pub speech_bubble_styles: Vec<SpeechBubbleStyle>,
    pub narrative_styles: Vec<NarrativeStyle>,
}

// ═══════════════════════════════════════════════════════════════════════
// ASSISTANCE PARAMETERS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueGeneration {
    pub context_awareness: bool,
    pub humor_level: u8,
    pub character_voice_preservation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteMethod {
    Contextual,
    Random,
    MoodBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPaletteGeneration {
    pub generation_method: PaletteMethod,
    pub consistency_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentVariation {
    pub variation_types: Vec<String>,
    pub complexity_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAssistance {
    pub dialogue_generation: DialogueGeneration,
    pub color_palette_generation: ColorPaletteGeneration,
    pub content_variation: ContentVariation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeCategory {
    Farming,
    Comedy,
    CharacterDevelopment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConstraint {
    pub category: ThemeCategory,
    pub restriction_level: u8,
}

/// How the narrative style of a panel is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NarrativeSelection {
    /// Always `NarrativeStyle::default()`.
    #[default]
    Fixed,
    /// Drawn from `template_components.narrative_styles`.
    FromConfig,
}

/// Immutable input to a `PanelGenerator`.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicPanelConfig {
    pub template_components: TemplateComponents,
    pub ai_assistance: AiAssistance,
    #[serde(default)]
    pub theme_constraints: Vec<ThemeConstraint>,
    #[serde(default)]
    pub narrative: NarrativeSelection,
}

impl Default for ComicPanelConfig {
    fn default() -> Self {
        Self {
            template_components: TemplateComponents {
                panel_layouts: vec![PanelLayout {
                    id: "default".to_string(),
                    name: "Standard Layout".to_string(),
                    panel_count: 3,
                    grid_template: "repeat(3, 1fr)".to_string(),
                    style_constraints: vec![StyleRule::new(StyleRuleKind::Layout, "grid-based")],
                }],
                speech_bubble_styles: vec![SpeechBubbleStyle {
                    kind: BubbleKind::Speech,
                    shape: BubbleShape::Rounded,
                    tail: TailPosition::Right,
                }],
                narrative_styles: vec![NarrativeStyle::default()],
            },
            ai_assistance: AiAssistance {
                dialogue_generation: DialogueGeneration {
                    context_awareness: true,
                    humor_level: 7,
                    character_voice_preservation: true,
                },
                color_palette_generation: ColorPaletteGeneration {
                    generation_method: PaletteMethod::Contextual,
                    consistency_level: 8,
                },
                content_variation: ContentVariation {
                    variation_types: vec!["dialogue".to_string(), "layout".to_string()],
                    complexity_level: 5,
                },
            },
            theme_constraints: vec![ThemeConstraint {
                category: ThemeCategory::Farming,
                restriction_level: 6,
            }],
            narrative: NarrativeSelection::Fixed,
        }
    }
}
