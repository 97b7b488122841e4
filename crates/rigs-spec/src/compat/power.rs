use super::CompatibilityVerdict;
use crate::{Attribute, Component, Unit};

/// Sum of declared power draw; missing values count as zero.
pub fn total_power_draw(components: &[&Component]) -> f64 {
    components.iter().map(|c| c.power_draw_watts()).sum()
}

/// PSU sufficiency: rated wattage must cover the total draw plus `headroom`.
///
/// A PSU without a usable wattage rating does not block the build.
pub fn check_power_sufficiency(
    components: &[&Component],
    psu: &Component,
    headroom: f64,
) -> CompatibilityVerdict {
    let draw = total_power_draw(components);
    let required = draw * (1.0 + headroom);

    let Some(wattage) = psu.measure(Attribute::Wattage, Unit::Watts) else {
        log::debug!("{} declares no wattage; skipping power check", psu.name);
        return CompatibilityVerdict::ok(format!(
            "PSU wattage not declared; {required:.0}W required"
        ));
    };

    if wattage < required {
        CompatibilityVerdict::fail(format!(
            "Insufficient PSU wattage: {} provides {wattage:.0}W, build needs {required:.0}W \
             ({draw:.0}W draw + {:.0}% headroom)",
            psu.name,
            headroom * 100.0
        ))
    } else {
        CompatibilityVerdict::ok(format!(
            "PSU provides {wattage:.0}W for {required:.0}W required"
        ))
    }
}
