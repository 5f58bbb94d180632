use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::SkillKind;

pub const DEFAULT_MAX_EXPERIENCE: u64 = 100;

/// Experience in one skill. Only the running total is stored; level and the
/// displayed remainder are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProgress {
    pub total_experience: u64,
    pub max_experience: u64,
}

impl Default for SkillProgress {
    fn default() -> Self {
        Self {
            total_experience: 0,
            max_experience: DEFAULT_MAX_EXPERIENCE,
        }
    }
}

impl SkillProgress {
    pub fn gain(&mut self, amount: u64) {
        self.total_experience = self.total_experience.saturating_add(amount);
    }

    pub fn level(&self) -> u64 {
        self.total_experience / self.max_experience.max(1) + 1
    }

    /// Experience into the current level.
    pub fn experience(&self) -> u64 {
        self.total_experience % self.max_experience.max(1)
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub farming: SkillProgress,
    pub crafting: SkillProgress,
    pub trading: SkillProgress,
}

impl Skills {
    pub fn get(&self, skill: SkillKind) -> &SkillProgress {
        match skill {
            SkillKind::Farming => &self.farming,
            SkillKind::Crafting => &self.crafting,
            SkillKind::Trading => &self.trading,
        }
    }

    pub fn get_mut(&mut self, skill: SkillKind) -> &mut SkillProgress {
        match skill {
            SkillKind::Farming => &mut self.farming,
            SkillKind::Crafting => &mut self.crafting,
            SkillKind::Trading => &mut self.trading,
        }
    }

    /// Returns the level after the gain.
    pub fn gain(&mut self, skill: SkillKind, amount: u64) -> u64 {
        let progress = self.get_mut(skill);
        progress.gain(amount);
        progress.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_and_remainder_follow_total() {
        let gains: [u64; 6] = [0, 35, 65, 1, 250, 49];
        let mut skill = SkillProgress::default();
        let mut sum = 0;
        for g in gains {
            skill.gain(g);
            sum += g;
            assert_eq!(skill.level(), sum / 100 + 1);
            assert_eq!(skill.experience(), sum % 100);
        }
        assert_eq!(skill.level(), 5);
        assert_eq!(skill.experience(), 0);
    }

    #[test]
    fn test_single_large_gain_crosses_several_levels() {
        let mut skills = Skills::default();
        assert_eq!(skills.gain(SkillKind::Trading, 999), 10);
        assert_eq!(skills.trading.experience(), 99);
        assert_eq!(skills.farming.level(), 1);
    }

    #[test]
    fn test_custom_max_experience() {
        let mut skill = SkillProgress {
            total_experience: 0,
            max_experience: 30,
        };
        skill.gain(95);
        assert_eq!((skill.level(), skill.experience()), (4, 5));
    }
}
