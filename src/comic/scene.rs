//! Scene content for a comic panel: who is in it, what they say, how it looks.
//!
//! Every categorical field is a closed enum, so a deserialized or generated
//! scene can only hold declared values. `complexity` is the one numeric field
//! and is range-checked by [`SceneDescription::validate`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FARM_THEME_WORDS: [&str; 10] = [
    "harvest", "crops", "sunlight", "growth", "nature", "seeds", "soil", "seasons", "magic",
    "adventure",
];

pub const CHARACTER_NAMES: [&str; 6] = [
    "Farmer Jane",
    "Magical Scarecrow",
    "Talking Seed",
    "Wind Spirit",
    "Crop Guardian",
    "Moonlight Farmer",
];

pub const COMPLEXITY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Surprised,
    Thoughtful,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Sad, Mood::Excited, Mood::Surprised, Mood::Thoughtful];
    /// Moods a generated protagonist may have.
    pub const PROTAGONIST: [Mood; 3] = [Mood::Happy, Mood::Excited, Mood::Thoughtful];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Humorous,
    Dramatic,
    Philosophical,
    Whimsical,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Humorous, Tone::Dramatic, Tone::Philosophical, Tone::Whimsical];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Adventure,
    SliceOfLife,
    Fantasy,
    Comedy,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Adventure, Theme::SliceOfLife, Theme::Fantasy, Theme::Comedy];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtStyle {
    Cartoon,
    Manga,
    Watercolor,
    ComicBook,
}

impl ArtStyle {
    pub const ALL: [ArtStyle; 4] = [ArtStyle::Cartoon, ArtStyle::Manga, ArtStyle::Watercolor, ArtStyle::ComicBook];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteName {
    Vibrant,
    Pastel,
    Monochrome,
    Vintage,
}

impl PaletteName {
    pub const ALL: [PaletteName; 4] = [
        PaletteName::Vibrant,
        PaletteName::Pastel,
        PaletteName::Monochrome,
        PaletteName::Vintage,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub mood: Mood,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub background: String,
    pub characters: Vec<Character>,
    pub speaker: String,
    pub caption: String,
    pub tone: Tone,
    pub theme: Theme,
    pub complexity: u8,
    pub art_style: ArtStyle,
    pub palette: PaletteName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("complexity {0} is outside 1..=5")]
    ComplexityOutOfRange(u8),
    #[error("scene has no characters")]
    NoCharacters,
}

impl SceneDescription {
    pub fn validate(&self) -> Result<(), SceneError> {
        if !COMPLEXITY_RANGE.contains(&self.complexity) {
            return Err(SceneError::ComplexityOutOfRange(self.complexity));
        }
        if self.characters.is_empty() {
            return Err(SceneError::NoCharacters);
        }
        Ok(())
    }

    /// Draws a complete scene. Each field consumes its own draw from `rng`.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let background = format!("{} landscape", pick(rng, &FARM_THEME_WORDS));
        let protagonist = Character {
            name: pick(rng, &CHARACTER_NAMES).to_string(),
            mood: pick(rng, &Mood::PROTAGONIST),
            role: "protagonist".to_string(),
        };
        let speaker = pick(rng, &CHARACTER_NAMES).to_string();
        let caption = caption(rng);

        Self {
            background,
            characters: vec![protagonist],
            speaker,
            caption,
            tone: pick(rng, &Tone::ALL),
            theme: pick(rng, &Theme::ALL),
            complexity: rng.gen_range(COMPLEXITY_RANGE),
            art_style: pick(rng, &ArtStyle::ALL),
            palette: pick(rng, &PaletteName::ALL),
        }
    }
}

fn caption<R: Rng>(rng: &mut R) -> String {
    let word = pick(rng, &FARM_THEME_WORDS);
    match rng.gen_range(0..4) {
        0 => format!("The {word} whispers a secret."),
        1 => format!("In the realm of {word}, magic unfolds."),
        2 => format!("A journey through {word} begins."),
        _ => format!("Wisdom grows like a {word}."),
    }
}

/// Every list passed here is a non-empty constant.
fn pick<R: Rng, T: Copy>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_scenes_are_valid() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..1000 {
            let scene = SceneDescription::generate(&mut rng);
            assert!(scene.validate().is_ok());
            assert!(Mood::PROTAGONIST.contains(&scene.characters[0].mood));
            assert_eq!(scene.characters[0].role, "protagonist");
            assert!(scene.background.ends_with(" landscape"));
        }
    }

    #[test]
    fn test_complexity_out_of_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut scene = SceneDescription::generate(&mut rng);
        scene.complexity = 6;
        assert_eq!(scene.validate(), Err(SceneError::ComplexityOutOfRange(6)));
        scene.complexity = 0;
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_unknown_mood_fails_to_deserialize() {
        assert_eq!(serde_json::from_str::<Mood>("\"thoughtful\"").unwrap(), Mood::Thoughtful);
        assert!(serde_json::from_str::<Mood>("\"angry\"").is_err());
        assert_eq!(serde_json::from_str::<Theme>("\"slice-of-life\"").unwrap(), Theme::SliceOfLife);
    }
}
