use once_cell::sync::Lazy;
use regex::Regex;

use super::CompatibilityVerdict;
use crate::{Attribute, Component, Unit};

static DDR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ddr\s*-?\s*(\d+)").unwrap());
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static SPEED_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:mhz|mt/s)?\s*(?:-|–|~|to)\s*(\d+(?:\.\d+)?)|(\d+(?:\.\d+)?)")
        .unwrap()
});
static VOLTAGE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:m?v)?\s*(?:-|–|~|to)\s*(\d+(?:\.\d+)?)|(\d+(?:\.\d+)?)")
        .unwrap()
});

/// Tolerance around a single declared voltage.
const VOLTAGE_TOLERANCE: f64 = 0.1;
const EPSILON: f64 = 1e-9;

/// Inclusive `[lo, hi]` interval.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    lo: f64,
    hi: f64,
}

impl Range {
    fn new(a: f64, b: f64) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    fn contains(&self, x: f64) -> bool {
        x >= self.lo - EPSILON && x <= self.hi + EPSILON
    }

    fn widen(self, by: f64) -> Self {
        Self {
            lo: self.lo - by,
            hi: self.hi + by,
        }
    }
}

fn format_ranges(ranges: &[Range], unit: &str) -> String {
    ranges
        .iter()
        .map(|r| {
            if r.lo == r.hi {
                format!("{}{unit}", r.lo)
            } else {
                format!("{}-{}{unit}", r.lo, r.hi)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every declared interval in `text`; single values become exact (or `widen`-ed) intervals.
fn parse_ranges(re: &Regex, text: &str, single_widen: f64) -> Vec<Range> {
    re.captures_iter(text)
        .filter_map(|c| {
            let num = |i: usize| c.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
            match (num(1), num(2), num(3)) {
                (Some(a), Some(b), _) => Some(Range::new(a, b)),
                (_, _, Some(x)) => Some(Range::new(x, x).widen(single_widen)),
                _ => None,
            }
        })
        .collect()
}

fn speed_ranges(text: &str) -> Vec<Range> {
    // "DDR4" would otherwise contribute a 4 MHz range
    let stripped = DDR.replace_all(text, " ");
    parse_ranges(&SPEED_RANGE, &stripped.to_lowercase(), 0.0)
        .into_iter()
        .filter(|r| r.hi >= 100.0)
        .collect()
}

/// Speed ranges of a motherboard field; a lone value under "Max ..." or
/// "up to ..." is a ceiling, not an exact speed.
fn board_speed_ranges(name: &str, value: &str) -> Vec<Range> {
    let ranges = speed_ranges(value);
    let name = name.to_lowercase();
    let value = value.to_lowercase();
    let is_ceiling = name.contains("max") || value.contains("max") || value.contains("up to");
    match ranges.as_slice() {
        [single] if is_ceiling && single.lo == single.hi => vec![Range::new(0.0, single.hi)],
        _ => ranges,
    }
}

fn voltage_ranges(text: &str) -> Vec<Range> {
    let lower = text.to_lowercase();
    let millivolts = lower.contains("mv");
    parse_ranges(&VOLTAGE_RANGE, &lower, 0.0)
        .into_iter()
        .map(|r| {
            let r = if millivolts || r.lo > 10.0 {
                Range::new(r.lo / 1000.0, r.hi / 1000.0)
            } else {
                r
            };
            if r.lo == r.hi {
                r.widen(VOLTAGE_TOLERANCE)
            } else {
                r
            }
        })
        .collect()
}

/// DDR generations mentioned in `text`, falling back to bare digits ("4").
fn ddr_versions(text: &str) -> Vec<u32> {
    let mut versions: Vec<u32> = DDR
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    if versions.is_empty() {
        versions = DIGIT
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .filter(|v| (1..=9).contains(v))
            .collect();
    }
    versions.sort_unstable();
    versions.dedup();
    versions
}

/// Yes/no reading of a free-text flag such as "Supported", "Non-ECC" or "No".
fn parse_flag(text: &str) -> Option<bool> {
    const NEGATIVE: &[&str] = &["non", "no", "not", "unsupported", "false", "without", "n/a"];
    const POSITIVE: &[&str] = &["yes", "ecc", "supported", "support", "true", "registered", "with"];

    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '/')
        .filter(|w| !w.is_empty())
        .collect();
    if words.iter().any(|w| NEGATIVE.contains(w)) {
        Some(false)
    } else if words.iter().any(|w| POSITIVE.contains(w)) {
        Some(true)
    } else {
        None
    }
}

fn ram_is_ecc(ram: &Component) -> bool {
    match ram.attribute_text(Attribute::Ecc).and_then(parse_flag) {
        Some(flag) => flag,
        None => {
            let name = ram.name.to_lowercase();
            name.contains("ecc") && !name.contains("non-ecc") && !name.contains("non ecc")
        }
    }
}

/// RAM ↔ motherboard check over type, speed, capacity, ECC and voltage.
///
/// Every dimension is evaluated; the reason lists all failing ones. A
/// dimension the motherboard does not declare passes.
pub fn check_memory_compatibility(ram: &Component, motherboard: &Component) -> CompatibilityVerdict {
    let mut failures: Vec<String> = Vec::new();

    // Type
    let ram_type = ram
        .attribute_text(Attribute::MemoryType)
        .map(ddr_versions)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            let from_name: Vec<u32> = DDR
                .captures_iter(&ram.name)
                .filter_map(|c| c[1].parse().ok())
                .collect();
            (!from_name.is_empty()).then_some(from_name)
        })
        .and_then(|v| v.first().copied());
    let board_types = motherboard
        .attribute_text(Attribute::MemoryType)
        .map(ddr_versions)
        .unwrap_or_default();
    if let Some(ram_type) = ram_type {
        if !board_types.is_empty() && !board_types.contains(&ram_type) {
            let supported = board_types
                .iter()
                .map(|v| format!("DDR{v}"))
                .collect::<Vec<_>>()
                .join("/");
            failures.push(format!("Type: RAM is DDR{ram_type}, motherboard supports {supported}"));
        }
    }

    // Speed
    if let Some(speed) = ram.measure(Attribute::MemorySpeed, Unit::Megahertz) {
        let ranges = motherboard
            .spec_for(Attribute::MemorySpeed)
            .map(|s| board_speed_ranges(&s.name, s.value.trim()))
            .unwrap_or_default();
        if !ranges.is_empty() && !ranges.iter().any(|r| r.contains(speed)) {
            failures.push(format!(
                "Speed: RAM runs at {speed}MHz, motherboard supports {}",
                format_ranges(&ranges, "MHz")
            ));
        }
    }

    // Capacity
    if let (Some(capacity), Some(max)) = (
        ram.measure(Attribute::MemoryCapacity, Unit::Gigabytes),
        motherboard.measure(Attribute::MemoryCapacity, Unit::Gigabytes),
    ) {
        if capacity > max + EPSILON {
            failures.push(format!(
                "Capacity: RAM is {capacity}GB, motherboard supports up to {max}GB"
            ));
        }
    }

    // ECC
    if ram_is_ecc(ram) {
        let board_ecc = motherboard
            .attribute_text(Attribute::Ecc)
            .and_then(parse_flag);
        if board_ecc == Some(false) {
            failures.push("ECC: RAM is ECC, motherboard does not support ECC".to_string());
        }
    }

    // Voltage
    if let Some(volts) = ram.measure(Attribute::MemoryVoltage, Unit::Volts) {
        let ranges = motherboard
            .attribute_text(Attribute::MemoryVoltage)
            .map(voltage_ranges)
            .unwrap_or_default();
        if !ranges.is_empty() && !ranges.iter().any(|r| r.contains(volts)) {
            let declared = motherboard
                .attribute_text(Attribute::MemoryVoltage)
                .unwrap_or_default();
            failures.push(format!(
                "Voltage: RAM needs {volts}V, motherboard supports {declared}"
            ));
        }
    }

    if failures.is_empty() {
        log::debug!("{} fits {}", ram.name, motherboard.name);
        CompatibilityVerdict::ok("RAM is compatible with motherboard")
    } else {
        let lines: Vec<String> = failures.iter().map(|f| format!("- {f}")).collect();
        CompatibilityVerdict::fail(format!(
            "RAM is not compatible with motherboard:\n{}",
            lines.join("\n")
        ))
    }
}
