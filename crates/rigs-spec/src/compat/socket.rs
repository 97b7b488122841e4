use once_cell::sync::Lazy;
use regex::Regex;

use super::CompatibilityVerdict;
use crate::spec::NormalizedSpec;
use crate::{Attribute, Component};

const INTEL_300: &[&str] = &["z370", "z390", "h370", "b360", "b365", "h310", "q370"];
const INTEL_400_500: &[&str] = &[
    "z490", "h470", "b460", "h410", "q470", "z590", "h570", "b560", "h510", "q570",
];
const INTEL_500_PLUS_Z490: &[&str] = &[
    "z590", "h570", "b560", "h510", "q570", "z490", "h470",
];
const INTEL_600_700: &[&str] = &["z690", "h670", "b660", "h610", "z790", "h770", "b760"];
const INTEL_800: &[&str] = &["z890", "b860", "h810"];
const AMD_AM4_EARLY: &[&str] = &["x370", "b350", "a320", "x470", "b450"];
const AMD_AM4_ZEN2: &[&str] = &["x370", "b350", "x470", "b450", "x570", "b550", "a520"];
const AMD_AM4_LATE: &[&str] = &["x570", "b550", "a520"];
const AMD_AM5: &[&str] = &["x670", "b650", "a620", "x870", "b850", "b840"];

/// CPU generation as far as chipset support is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Generation {
    /// Intel Core N-th generation
    IntelCore(u8),
    /// Intel Core Ultra 200 series
    IntelUltra200,
    /// AMD Ryzen desktop series (1000, 2000, ...)
    Ryzen(u16),
}

impl Generation {
    fn label(self) -> String {
        match self {
            Generation::IntelCore(n) => format!("Intel {}", ordinal(n)),
            Generation::IntelUltra200 => "Intel Core Ultra 200".to_string(),
            Generation::Ryzen(series) => format!("Ryzen {series}"),
        }
    }

    fn chipsets(self) -> Option<&'static [&'static str]> {
        let family = match self {
            Generation::IntelCore(8 | 9) => INTEL_300,
            Generation::IntelCore(10) => INTEL_400_500,
            Generation::IntelCore(11) => INTEL_500_PLUS_Z490,
            Generation::IntelCore(12..=14) => INTEL_600_700,
            Generation::IntelUltra200 => INTEL_800,
            Generation::Ryzen(1000 | 2000) => AMD_AM4_EARLY,
            Generation::Ryzen(3000) => AMD_AM4_ZEN2,
            Generation::Ryzen(4000 | 5000) => AMD_AM4_LATE,
            Generation::Ryzen(7000 | 8000 | 9000) => AMD_AM5,
            _ => return None,
        };
        Some(family)
    }
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix} Gen")
}

const CODENAMES: &[(&str, Generation)] = &[
    ("coffee lake refresh", Generation::IntelCore(9)),
    ("coffee lake", Generation::IntelCore(8)),
    ("comet lake", Generation::IntelCore(10)),
    ("rocket lake", Generation::IntelCore(11)),
    ("alder lake", Generation::IntelCore(12)),
    ("raptor lake refresh", Generation::IntelCore(14)),
    ("raptor lake", Generation::IntelCore(13)),
    ("arrow lake", Generation::IntelUltra200),
    ("summit ridge", Generation::Ryzen(1000)),
    ("pinnacle ridge", Generation::Ryzen(2000)),
    ("matisse", Generation::Ryzen(3000)),
    ("renoir", Generation::Ryzen(4000)),
    ("vermeer", Generation::Ryzen(5000)),
    ("cezanne", Generation::Ryzen(5000)),
    ("raphael", Generation::Ryzen(7000)),
    ("phoenix", Generation::Ryzen(8000)),
    ("granite ridge", Generation::Ryzen(9000)),
];

static INTEL_ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2})\s*(?:st|nd|rd|th)?\s*gen").unwrap());
static INTEL_MODEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bi[3579]\s*-?\s*(\d{4,5})").unwrap());
static CORE_ULTRA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ultra\s*(?:[3579]\s*)?(?:2\d\d|series\s*2)").unwrap());
static RYZEN_SERIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ryzen\s*(?:[3579]\s+)?(?:pro\s+)?(\d)\d{3}").unwrap());
static ZEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bzen\s*(\d)?(\+)?").unwrap());
static CHIPSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([abhqxz]\d{3})e?\b").unwrap());

fn parse_generation(text: &str) -> Option<Generation> {
    let lower = text.to_lowercase();

    if let Some(&(_, generation)) = CODENAMES.iter().find(|(name, _)| lower.contains(name)) {
        return Some(generation);
    }
    if CORE_ULTRA.is_match(&lower) {
        return Some(Generation::IntelUltra200);
    }
    if let Some(c) = RYZEN_SERIES.captures(&lower) {
        let digit: u16 = c[1].parse().ok()?;
        return Some(Generation::Ryzen(digit * 1000));
    }
    if let Some(c) = ZEN.captures(&lower) {
        let series = match (c.get(1).map(|m| m.as_str()), c.get(2).is_some()) {
            (None | Some("1"), true) => 2000,
            (Some("1"), false) => 1000,
            (Some("2"), _) => 3000,
            (Some("3"), _) => 5000,
            (Some("4"), _) => 7000,
            (Some("5"), _) => 9000,
            _ => return None,
        };
        return Some(Generation::Ryzen(series));
    }
    if let Some(c) = INTEL_MODEL.captures(&lower) {
        let model = &c[1];
        let generation = if model.len() == 5 {
            model[..2].parse().ok()?
        } else {
            model[..1].parse().ok()?
        };
        return Some(Generation::IntelCore(generation));
    }
    if lower.contains("ryzen") || lower.contains("amd") {
        // "Ryzen 5000 series" without a model number
        let series: u16 = lower
            .split(|c: char| !c.is_ascii_digit())
            .find(|t| t.len() == 4 && t.ends_with("000"))?
            .parse()
            .ok()?;
        return Some(Generation::Ryzen(series));
    }
    if let Some(c) = INTEL_ORDINAL.captures(&lower) {
        return Some(Generation::IntelCore(c[1].parse().ok()?));
    }
    None
}

fn parse_chipset(text: &str) -> Option<String> {
    CHIPSET
        .captures(text)
        .map(|c| c[1].to_ascii_lowercase())
}

fn socket_id(component: &Component) -> Option<String> {
    match component.normalized(Attribute::Socket)? {
        NormalizedSpec::Identifier { id, .. } => Some(id),
        _ => None,
    }
}

/// CPU ↔ motherboard socket and chipset/generation check.
pub fn check_socket_compatibility(
    cpu: Option<&Component>,
    motherboard: Option<&Component>,
) -> CompatibilityVerdict {
    let (Some(cpu), Some(motherboard)) = (cpu, motherboard) else {
        return CompatibilityVerdict::fail(
            "Missing component: socket check needs both a CPU and a motherboard",
        );
    };

    let mut failures = Vec::new();

    let cpu_socket = socket_id(cpu);
    let board_socket = socket_id(motherboard);
    match (&cpu_socket, &board_socket) {
        (Some(a), Some(b)) if a == b => {}
        (Some(a), Some(b)) => failures.push(format!(
            "Socket mismatch: CPU {} uses {}, motherboard {} uses {}",
            cpu.name,
            a.to_uppercase(),
            motherboard.name,
            b.to_uppercase()
        )),
        _ => {
            let missing = if cpu_socket.is_none() { cpu } else { motherboard };
            failures.push(format!(
                "Socket mismatch: {} does not declare a socket",
                missing.name
            ));
        }
    }

    let generation = cpu
        .attribute_text(Attribute::Generation)
        .and_then(parse_generation);
    let chipset = motherboard
        .attribute_text(Attribute::Chipset)
        .and_then(parse_chipset);
    if let (Some(generation), Some(chipset)) = (generation, &chipset) {
        match generation.chipsets() {
            Some(family) if !family.contains(&chipset.as_str()) => {
                let known = [
                    INTEL_300,
                    INTEL_400_500,
                    INTEL_600_700,
                    INTEL_800,
                    AMD_AM4_EARLY,
                    AMD_AM4_ZEN2,
                    AMD_AM4_LATE,
                    AMD_AM5,
                ]
                .iter()
                .any(|f| f.contains(&chipset.as_str()));
                if known {
                    failures.push(format!(
                        "Chipset mismatch: {} does not support {} processors",
                        chipset.to_uppercase(),
                        generation.label()
                    ));
                } else {
                    log::debug!("Unknown chipset {chipset}; skipping generation check");
                }
            }
            _ => {}
        }
    }

    if failures.is_empty() {
        let socket = cpu_socket.unwrap_or_default().to_uppercase();
        log::debug!("{} fits {} ({socket})", cpu.name, motherboard.name);
        CompatibilityVerdict::ok(format!("Socket compatible: {socket}"))
    } else {
        CompatibilityVerdict::fail(failures.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn cpu(socket: &str) -> Component {
        Component::new("cpu", "Test CPU", Category::Cpu).with_spec("Socket", socket)
    }

    fn board(socket: &str) -> Component {
        Component::new("mb", "Test Board", Category::Motherboard).with_spec("Socket", socket)
    }

    #[test]
    fn test_generation_parsing() {
        assert_eq!(parse_generation("12th Gen"), Some(Generation::IntelCore(12)));
        assert_eq!(parse_generation("Raptor Lake Refresh"), Some(Generation::IntelCore(14)));
        assert_eq!(parse_generation("Core i7-9700K"), Some(Generation::IntelCore(9)));
        assert_eq!(parse_generation("i5-13400F"), Some(Generation::IntelCore(13)));
        assert_eq!(parse_generation("Core Ultra 7 265K"), Some(Generation::IntelUltra200));
        assert_eq!(parse_generation("Ryzen 5 5600X"), Some(Generation::Ryzen(5000)));
        assert_eq!(parse_generation("Ryzen 7000 Series"), Some(Generation::Ryzen(7000)));
        assert_eq!(parse_generation("Zen 3"), Some(Generation::Ryzen(5000)));
        assert_eq!(parse_generation("Zen+"), Some(Generation::Ryzen(2000)));
        assert_eq!(parse_generation("Vermeer"), Some(Generation::Ryzen(5000)));
        assert_eq!(parse_generation("mystery"), None);
    }

    #[test]
    fn test_chipset_parsing() {
        assert_eq!(parse_chipset("AMD B550").as_deref(), Some("b550"));
        assert_eq!(parse_chipset("X670E").as_deref(), Some("x670"));
        assert_eq!(parse_chipset("Intel Z790 Express").as_deref(), Some("z790"));
        assert_eq!(parse_chipset("TRX40"), None);
    }

    #[test]
    fn test_missing_component() {
        let verdict = check_socket_compatibility(Some(&cpu("AM4")), None);
        assert!(!verdict.compatible);
        assert!(verdict.reason.contains("Missing component"));
    }

    #[test]
    fn test_missing_socket_attribute() {
        let bare = Component::new("mb", "Bare Board", Category::Motherboard);
        let verdict = check_socket_compatibility(Some(&cpu("AM4")), Some(&bare));
        assert!(!verdict.compatible);
        assert!(verdict.reason.contains("Socket mismatch"));
        assert!(verdict.reason.contains("Bare Board"));
    }

    #[test]
    fn test_socket_spelling_is_irrelevant() {
        for (a, b) in [("AM4", "Socket AM4"), ("am-4", "AM4"), ("LGA 1700", "FCLGA1700")] {
            let forward = check_socket_compatibility(Some(&cpu(a)), Some(&board(b)));
            let backward = check_socket_compatibility(Some(&cpu(b)), Some(&board(a)));
            assert!(forward.compatible, "{a} vs {b}: {}", forward.reason);
            assert_eq!(forward.compatible, backward.compatible);
        }
    }

    #[test]
    fn test_am4_never_matches_tr4() {
        let verdict = check_socket_compatibility(Some(&cpu("TR4")), Some(&board("AM4")));
        assert!(!verdict.compatible);
    }

    #[test]
    fn test_generation_chipset_mismatch() {
        let cpu = cpu("AM4").with_spec("Generation", "Ryzen 5000");
        let board = board("AM4").with_spec("Chipset", "B450");
        let verdict = check_socket_compatibility(Some(&cpu), Some(&board));
        assert!(!verdict.compatible);
        assert_eq!(
            verdict.reason,
            "Chipset mismatch: B450 does not support Ryzen 5000 processors"
        );
    }

    #[test]
    fn test_ryzen_3000_on_a520() {
        let cpu = cpu("AM4").with_spec("Generation", "Ryzen 3000");
        let board = board("AM4").with_spec("Chipset", "AMD A520");
        assert!(check_socket_compatibility(Some(&cpu), Some(&board)).compatible);

        let board = self::board("AM4").with_spec("Chipset", "A320");
        assert!(!check_socket_compatibility(Some(&cpu), Some(&board)).compatible);
    }

    #[test]
    fn test_every_failing_subcheck_is_listed() {
        let cpu = cpu("LGA1700").with_spec("Generation", "12th Gen");
        let board = board("AM5").with_spec("Chipset", "B650");
        let verdict = check_socket_compatibility(Some(&cpu), Some(&board));
        assert!(!verdict.compatible);
        assert!(verdict.reason.starts_with("Socket mismatch"));
        assert!(verdict.reason.contains("; Chipset mismatch: B650"));
    }

    #[test]
    fn test_generation_check_is_vacuous_without_data() {
        let cpu = cpu("LGA1700").with_spec("Generation", "13th Gen");
        let board = board("LGA1700");
        assert!(check_socket_compatibility(Some(&cpu), Some(&board)).compatible);

        let board = board.with_spec("Chipset", "Z790");
        assert!(check_socket_compatibility(Some(&cpu), Some(&board)).compatible);
    }
}
