//! Compatibility rules between catalog components.
//!
//! Every rule is a pure predicate that degrades gracefully: an attribute a
//! rule depends on being absent makes that rule pass rather than block the
//! build, except where a rule explicitly requires it (socket ids).

mod memory;
mod power;
mod socket;

pub use memory::check_memory_compatibility;
pub use power::{check_power_sufficiency, total_power_draw};
pub use socket::check_socket_compatibility;

use serde::Serialize;

use crate::{Category, Component};

/// Headroom added on top of the total draw when sizing a PSU.
pub const DEFAULT_PSU_HEADROOM: f64 = 0.20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityVerdict {
    pub compatible: bool,
    pub reason: String,
}

impl CompatibilityVerdict {
    pub fn ok(reason: impl Into<String>) -> Self {
        Self {
            compatible: true,
            reason: reason.into(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            compatible: false,
            reason: reason.into(),
        }
    }
}

/// Tunables for whole-build checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompatibilityRules {
    pub psu_headroom: f64,
}

impl Default for CompatibilityRules {
    fn default() -> Self {
        Self {
            psu_headroom: DEFAULT_PSU_HEADROOM,
        }
    }
}

impl CompatibilityRules {
    pub fn with_psu_headroom(psu_headroom: f64) -> Self {
        Self {
            psu_headroom: psu_headroom.max(0.0),
        }
    }

    /// Check a whole build; the first failing rule's verdict is returned.
    ///
    /// Rules only apply when their participants are present: socket needs a
    /// CPU and a motherboard, memory a motherboard and at least one RAM
    /// module, power a PSU. Components outside the buildable categories are
    /// ignored.
    pub fn check(&self, components: &[&Component]) -> CompatibilityVerdict {
        let parts: Vec<&Component> = components
            .iter()
            .copied()
            .filter(|c| {
                let keep = c.category.is_build_part();
                if !keep {
                    log::debug!("Skipping {} ({}) in compatibility check", c.name, c.category);
                }
                keep
            })
            .collect();

        let first = |category: Category| parts.iter().copied().find(|c| c.category == category);
        let cpu = first(Category::Cpu);
        let motherboard = first(Category::Motherboard);
        let psu = first(Category::Psu);

        if cpu.is_some() && motherboard.is_some() {
            let verdict = check_socket_compatibility(cpu, motherboard);
            if !verdict.compatible {
                return verdict;
            }
        }

        if let Some(motherboard) = motherboard {
            for ram in parts.iter().filter(|c| c.category == Category::Ram) {
                let verdict = check_memory_compatibility(ram, motherboard);
                if !verdict.compatible {
                    return verdict;
                }
            }
        }

        if let Some(psu) = psu {
            let verdict = check_power_sufficiency(&parts, psu, self.psu_headroom);
            if !verdict.compatible {
                return verdict;
            }
        }

        CompatibilityVerdict::ok("All compatibility checks passed")
    }
}

/// Whole-build compatibility with the default rules.
pub fn check_compatibility(components: &[Component]) -> CompatibilityVerdict {
    let refs: Vec<&Component> = components.iter().collect();
    CompatibilityRules::default().check(&refs)
}
