//! Heuristic performance scores.
//!
//! Component scores are linear in a few normalized attributes and clamped to
//! `[0, 100]`. High-end parts saturate at 100; nothing distinguishes "at the
//! cap" from "exactly 100".

use std::fmt;

use serde::Serialize;

use crate::compat::total_power_draw;
use crate::{Attribute, Category, Component, Unit};

pub const MAX_SCORE: f64 = 100.0;

/// Flat score for buildable categories without a formula.
pub const BASE_SCORE: f64 = 50.0;

fn clamp_score(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}

/// Score of a single component in `[0, 100]`.
pub fn score_component(component: &Component) -> f64 {
    let measure = |attribute, unit| component.measure(attribute, unit).unwrap_or(0.0);

    let raw = match component.category {
        Category::Cpu => {
            let cores = measure(Attribute::Cores, Unit::Cores);
            let threads = measure(Attribute::Threads, Unit::Threads);
            let ghz = component
                .measure(Attribute::BaseClock, Unit::Gigahertz)
                .or_else(|| component.measure(Attribute::BoostClock, Unit::Gigahertz))
                .unwrap_or(0.0);
            10.0 * cores + 5.0 * threads + 15.0 * ghz
        }
        Category::Gpu => {
            let vram = measure(Attribute::Vram, Unit::Gigabytes);
            let mhz = measure(Attribute::CoreClock, Unit::Megahertz);
            10.0 * vram + mhz / 10.0
        }
        Category::Ram => {
            let gb = measure(Attribute::MemoryCapacity, Unit::Gigabytes);
            let mhz = measure(Attribute::MemorySpeed, Unit::Megahertz);
            5.0 * gb + mhz / 100.0
        }
        category if category.is_build_part() => BASE_SCORE,
        _ => 0.0,
    };

    clamp_score(raw)
}

/// 80 PLUS certification tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EfficiencyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Titanium,
}

impl EfficiencyTier {
    const ALL: [EfficiencyTier; 5] = [
        EfficiencyTier::Titanium,
        EfficiencyTier::Platinum,
        EfficiencyTier::Gold,
        EfficiencyTier::Silver,
        EfficiencyTier::Bronze,
    ];

    pub fn bonus(self) -> f64 {
        match self {
            EfficiencyTier::Titanium => 50.0,
            EfficiencyTier::Platinum => 40.0,
            EfficiencyTier::Gold => 30.0,
            EfficiencyTier::Silver => 20.0,
            EfficiencyTier::Bronze => 10.0,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            EfficiencyTier::Titanium => "titanium",
            EfficiencyTier::Platinum => "platinum",
            EfficiencyTier::Gold => "gold",
            EfficiencyTier::Silver => "silver",
            EfficiencyTier::Bronze => "bronze",
        }
    }

    /// Highest tier named anywhere in `text`.
    pub fn detect(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        Self::ALL.into_iter().find(|t| lower.contains(t.keyword()))
    }

    /// Tier of a PSU, from its efficiency attribute or any other specification text.
    pub fn of_psu(psu: &Component) -> Option<Self> {
        psu.attribute_text(Attribute::Efficiency)
            .and_then(Self::detect)
            .or_else(|| {
                psu.specifications
                    .iter()
                    .find_map(|s| Self::detect(&s.value))
            })
            .or_else(|| Self::detect(&psu.name))
    }
}

impl fmt::Display for EfficiencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EfficiencyTier::Titanium => "80+ Titanium",
            EfficiencyTier::Platinum => "80+ Platinum",
            EfficiencyTier::Gold => "80+ Gold",
            EfficiencyTier::Silver => "80+ Silver",
            EfficiencyTier::Bronze => "80+ Bronze",
        };
        f.write_str(label)
    }
}

/// Points for PSU headroom, in `[0, 50]`; 20–30% above draw is ideal.
pub fn headroom_points(headroom_percent: f64) -> f64 {
    if !headroom_percent.is_finite() || headroom_percent < 0.0 {
        0.0
    } else if headroom_percent < 20.0 {
        50.0 * headroom_percent / 20.0
    } else if headroom_percent <= 30.0 {
        50.0
    } else {
        (50.0 - 0.5 * (headroom_percent - 30.0)).max(0.0)
    }
}

/// Build-level usage profile scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProfileScores {
    pub gaming: f64,
    pub workstation: f64,
    pub efficiency: f64,
}

impl ProfileScores {
    /// Profile scores of a build; a missing category contributes 0.
    pub fn for_build(parts: &[&Component]) -> Self {
        let score_of = |category: Category| {
            parts
                .iter()
                .find(|c| c.category == category)
                .map(|c| score_component(c))
                .unwrap_or(0.0)
        };
        let cpu = score_of(Category::Cpu);
        let gpu = score_of(Category::Gpu);
        let ram = score_of(Category::Ram);
        let storage = score_of(Category::Storage);

        Self {
            gaming: 0.45 * gpu + 0.25 * cpu + 0.15 * ram + 0.15 * storage,
            workstation: 0.40 * cpu + 0.25 * ram + 0.20 * storage + 0.15 * gpu,
            efficiency: efficiency_score(parts),
        }
    }
}

/// PSU headroom points plus the certification bonus, clamped to 100.
pub fn efficiency_score(parts: &[&Component]) -> f64 {
    let Some(psu) = parts.iter().find(|c| c.category == Category::Psu) else {
        return 0.0;
    };

    let draw = total_power_draw(parts);
    let headroom = match psu.measure(Attribute::Wattage, Unit::Watts) {
        Some(watts) if draw > 0.0 => headroom_points((watts - draw) / draw * 100.0),
        _ => 0.0,
    };
    let bonus = EfficiencyTier::of_psu(psu).map_or(0.0, EfficiencyTier::bonus);

    clamp_score(headroom + bonus)
}

/// `100 · exp(−variance / 1000)` over the member scores; evenly matched builds score high.
pub fn balance_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return MAX_SCORE;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    clamp_score(MAX_SCORE * (-variance / 1000.0).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cpu_formula() {
        let cpu = Component::new("c", "Quad", Category::Cpu)
            .with_spec("Cores", "4")
            .with_spec("Threads", "4")
            .with_spec("Base Clock", "1000MHz");
        // 40 + 20 + 15
        assert!(approx(score_component(&cpu), 75.0));
    }

    #[test]
    fn test_cpu_falls_back_to_boost_clock() {
        let cpu = Component::new("c", "Dual", Category::Cpu)
            .with_spec("Cores", "2")
            .with_spec("Boost Clock", "2GHz");
        assert!(approx(score_component(&cpu), 50.0));
    }

    #[test]
    fn test_high_end_parts_saturate() {
        let cpu = Component::new("c", "Big", Category::Cpu)
            .with_spec("Cores", "16")
            .with_spec("Threads", "32")
            .with_spec("Base Clock", "4.5GHz");
        assert_eq!(score_component(&cpu), MAX_SCORE);
    }

    #[test]
    fn test_gpu_and_ram_formulas() {
        let gpu = Component::new("g", "GPU", Category::Gpu)
            .with_spec("VRAM", "4GB")
            .with_spec("Core Clock", "1500MHz");
        assert_eq!(score_component(&gpu), MAX_SCORE);

        let gpu = Component::new("g", "GPU", Category::Gpu)
            .with_spec("VRAM", "2GB")
            .with_spec("Core Clock", "500MHz");
        assert!(approx(score_component(&gpu), 70.0));

        let ram = Component::new("r", "RAM", Category::Ram)
            .with_spec("Capacity", "2x4GB")
            .with_spec("Speed", "DDR4-3200");
        assert!(approx(score_component(&ram), 72.0));
    }

    #[test]
    fn test_base_and_unscored_categories() {
        let case = Component::new("k", "Case", Category::Case);
        let laptop = Component::new("l", "Laptop", Category::Laptop).with_spec("RAM", "16GB");
        assert_eq!(score_component(&case), BASE_SCORE);
        assert_eq!(score_component(&laptop), 0.0);
    }

    #[test]
    fn test_malformed_specs_score_zero() {
        let cpu = Component::new("c", "Mystery", Category::Cpu)
            .with_spec("Cores", "many")
            .with_spec("Base Clock", "fast");
        assert_eq!(score_component(&cpu), 0.0);
    }

    #[test]
    fn test_headroom_points() {
        assert_eq!(headroom_points(-5.0), 0.0);
        assert_eq!(headroom_points(10.0), 25.0);
        assert_eq!(headroom_points(20.0), 50.0);
        assert_eq!(headroom_points(30.0), 50.0);
        assert_eq!(headroom_points(50.0), 40.0);
        assert_eq!(headroom_points(500.0), 0.0);
    }

    #[test]
    fn test_efficiency_tier_detection() {
        assert_eq!(EfficiencyTier::detect("80+ Gold"), Some(EfficiencyTier::Gold));
        assert_eq!(
            EfficiencyTier::detect("80 PLUS Titanium"),
            Some(EfficiencyTier::Titanium)
        );
        assert_eq!(EfficiencyTier::detect("80+"), None);

        let psu = Component::new("p", "PSU", Category::Psu).with_spec("Wattage", "650W 80+ Bronze");
        assert_eq!(EfficiencyTier::of_psu(&psu), Some(EfficiencyTier::Bronze));
    }

    #[test]
    fn test_profile_scores() {
        let cpu = Component::new("c", "CPU", Category::Cpu)
            .with_spec("Cores", "4")
            .with_spec("Threads", "4")
            .with_spec("Base Clock", "1GHz")
            .with_power_draw(200.0);
        let gpu = Component::new("g", "GPU", Category::Gpu)
            .with_spec("VRAM", "2GB")
            .with_spec("Core Clock", "500MHz")
            .with_power_draw(300.0);
        let psu = Component::new("p", "PSU", Category::Psu)
            .with_spec("Wattage", "625W")
            .with_spec("Efficiency", "80+ Gold");

        let profile = ProfileScores::for_build(&[&cpu, &gpu, &psu]);
        assert!(approx(profile.gaming, 0.45 * 70.0 + 0.25 * 75.0));
        assert!(approx(profile.workstation, 0.40 * 75.0 + 0.15 * 70.0));
        // 25% headroom over 500W draw
        assert!(approx(profile.efficiency, 80.0));
    }

    #[test]
    fn test_efficiency_without_psu() {
        let cpu = Component::new("c", "CPU", Category::Cpu).with_power_draw(65.0);
        assert_eq!(efficiency_score(&[&cpu]), 0.0);
    }

    #[test]
    fn test_balance_score() {
        assert_eq!(balance_score(&[60.0, 60.0, 60.0]), MAX_SCORE);
        assert!(approx(balance_score(&[0.0, 100.0]), 100.0 * (-2.5f64).exp()));
        assert!(balance_score(&[50.0, 55.0]) > balance_score(&[10.0, 90.0]));
    }
}
