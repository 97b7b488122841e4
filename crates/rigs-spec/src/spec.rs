//! Free-text specification normalization.
//!
//! Vendor feeds and manual entry produce values like `"DDR4-3200"`,
//! `"650W 80+ Gold"` or `"Socket AM4"`. [`normalize`] maps a
//! `(category, name, value)` triple onto a [`NormalizedSpec`] using a single
//! declarative attribute table (`category → attribute → aliases, pattern,
//! canonicalizer`). The same table backs attribute lookup for the
//! compatibility rules, so the two can never drift apart.
//!
//! Normalization is total: unknown names fall back to unit sniffing, and
//! values without a usable number produce a magnitude of `0`.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::{Category, Component, Specification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecKind {
    StorageSize,
    Frequency,
    MemorySize,
    CoreCount,
    ThreadCount,
    Wattage,
    Socket,
    DdrVersion,
    Voltage,
    /// CAS timing in clock cycles
    Latency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Gigabytes,
    Megabytes,
    Gigahertz,
    Megahertz,
    Cores,
    Threads,
    Watts,
    Volts,
    Ddr,
    Cycles,
}

impl Unit {
    /// Conversion factor from `self` into `target`, if the two measure the same thing.
    fn factor_to(self, target: Unit) -> Option<f64> {
        use Unit::*;
        match (self, target) {
            (a, b) if a == b => Some(1.0),
            (Gigabytes, Megabytes) => Some(1024.0),
            (Megabytes, Gigabytes) => Some(1.0 / 1024.0),
            (Gigahertz, Megahertz) => Some(1000.0),
            (Megahertz, Gigahertz) => Some(0.001),
            _ => None,
        }
    }
}

/// Result of normalizing one specification value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NormalizedSpec {
    Classified {
        kind: SpecKind,
        magnitude: f64,
        unit: Unit,
    },
    Identifier {
        kind: SpecKind,
        id: String,
    },
    Unclassified {
        raw: String,
    },
}

impl NormalizedSpec {
    pub fn kind(&self) -> Option<SpecKind> {
        match self {
            NormalizedSpec::Classified { kind, .. } | NormalizedSpec::Identifier { kind, .. } => {
                Some(*kind)
            }
            NormalizedSpec::Unclassified { .. } => None,
        }
    }

    pub fn magnitude(&self) -> Option<f64> {
        match self {
            NormalizedSpec::Classified { magnitude, .. } => Some(*magnitude),
            _ => None,
        }
    }

    /// Magnitude converted into `unit` (GB↔MB, GHz↔MHz).
    pub fn magnitude_in(&self, unit: Unit) -> Option<f64> {
        match self {
            NormalizedSpec::Classified {
                magnitude,
                unit: own,
                ..
            } => own.factor_to(unit).map(|f| round6(magnitude * f)),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            NormalizedSpec::Identifier { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for NormalizedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedSpec::Classified {
                kind,
                magnitude,
                unit,
            } => match unit {
                // TB only when the rounded figure reads back as the same GB value
                Unit::Gigabytes
                    if *kind == SpecKind::StorageSize
                        && *magnitude >= 1024.0
                        && (round6(magnitude / 1024.0) * 1024.0 - magnitude).abs() < 1e-9 =>
                {
                    write!(f, "{}TB", round6(magnitude / 1024.0))
                }
                Unit::Gigabytes => write!(f, "{magnitude}GB"),
                Unit::Megabytes => write!(f, "{magnitude}MB"),
                Unit::Gigahertz => write!(f, "{magnitude}GHz"),
                Unit::Megahertz => write!(f, "{magnitude}MHz"),
                Unit::Cores => write!(f, "{magnitude} cores"),
                Unit::Threads => write!(f, "{magnitude} threads"),
                Unit::Watts => write!(f, "{magnitude}W"),
                Unit::Volts => write!(f, "{magnitude}V"),
                Unit::Ddr => write!(f, "DDR{magnitude}"),
                Unit::Cycles => write!(f, "CL{magnitude}"),
            },
            NormalizedSpec::Identifier { id, .. } => f.write_str(id),
            NormalizedSpec::Unclassified { raw } => f.write_str(raw),
        }
    }
}

/// Attributes recognized by the per-category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Cores,
    Threads,
    BaseClock,
    BoostClock,
    Cache,
    Socket,
    Generation,
    Tdp,
    Chipset,
    MemoryType,
    MemorySpeed,
    /// Module/kit capacity for RAM, maximum supported memory for motherboards
    MemoryCapacity,
    MemoryVoltage,
    Ecc,
    Latency,
    Vram,
    CoreClock,
    Wattage,
    Efficiency,
    StorageCapacity,
}

#[derive(Debug, Clone, Copy)]
enum Canonicalizer {
    /// Byte sizes, converted into the given unit (TB→GB ×1024, MB→GB ÷1024)
    Size(SpecKind, Unit),
    /// Like `Size`, multiplied by a leading kit count ("2x16GB")
    KitSize,
    Frequency(Unit),
    Count(SpecKind, Unit),
    Watts,
    Volts,
    Ddr,
    Latency,
    Socket,
    /// Recognized but free-form (chipset names, generations, flags)
    Text,
}

const P_SIZE: &str = r"(?i)(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>tb|gb|mb|kb)\b";
const P_KIT_SIZE: &str =
    r"(?i)(?:(?P<kit>\d+)\s*[x×]\s*)?(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>tb|gb|mb)\b";
const P_FREQ: &str = r"(?i)(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>ghz|mhz|mt/s)";
const P_MEMORY_SPEED: &str =
    r"(?i)(?:ddr\d\s*[-\s]?\s*)?(?P<num>\d{3,5}(?:\.\d+)?)\s*(?P<unit>mhz|mt/s|ghz)?";
const P_CORES: &str = r"(?i)(?P<num>\d+)\s*-?\s*(?:c\b|cores?\b)";
const P_THREADS: &str = r"(?i)(?P<num>\d+)\s*-?\s*(?:t\b|threads?\b)";
const P_WATTS: &str = r"(?i)(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>kw|w|watts?)\b";
const P_VOLTS: &str = r"(?i)(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>mv|v|volts?)\b";
const P_DDR: &str = r"(?i)ddr\s*(?P<num>\d+)";
const P_LATENCY: &str = r"(?i)(?:cl|cas)\s*-?\s*(?P<num>\d+)";

/// First numeric token with whatever letters follow it; used when an
/// attribute's own pattern does not match.
static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>[a-z/]+)?").unwrap());

type Row = (
    Attribute,
    &'static [&'static str],
    Option<&'static str>,
    Canonicalizer,
);

const SOCKET_ROW: Row = (
    Attribute::Socket,
    &["socket", "cpu socket", "socket type", "platform"],
    None,
    Canonicalizer::Socket,
);

const CPU_ATTRIBUTES: &[Row] = &[
    (
        Attribute::Cores,
        &["cores", "core count", "cpu cores", "# of cores", "number of cores", "core"],
        Some(P_CORES),
        Canonicalizer::Count(SpecKind::CoreCount, Unit::Cores),
    ),
    (
        Attribute::Threads,
        &["threads", "thread count", "# of threads", "number of threads", "thread"],
        Some(P_THREADS),
        Canonicalizer::Count(SpecKind::ThreadCount, Unit::Threads),
    ),
    (
        Attribute::BaseClock,
        &["base clock", "base frequency", "clock speed", "frequency", "speed", "clock", "core clock"],
        Some(P_FREQ),
        Canonicalizer::Frequency(Unit::Gigahertz),
    ),
    (
        Attribute::BoostClock,
        &["boost clock", "max boost clock", "boost frequency", "turbo", "turbo frequency", "max turbo frequency"],
        Some(P_FREQ),
        Canonicalizer::Frequency(Unit::Gigahertz),
    ),
    (
        Attribute::Cache,
        &["cache", "l3 cache", "l2 cache", "total cache", "smart cache"],
        Some(P_SIZE),
        Canonicalizer::Size(SpecKind::MemorySize, Unit::Megabytes),
    ),
    SOCKET_ROW,
    (
        Attribute::Generation,
        &["generation", "gen", "series", "architecture", "family", "codename"],
        None,
        Canonicalizer::Text,
    ),
    (
        Attribute::Tdp,
        &["tdp", "default tdp", "thermal design power", "power", "base power"],
        Some(P_WATTS),
        Canonicalizer::Watts,
    ),
];

const MOTHERBOARD_ATTRIBUTES: &[Row] = &[
    SOCKET_ROW,
    (
        Attribute::Chipset,
        &["chipset"],
        None,
        Canonicalizer::Text,
    ),
    (
        Attribute::MemoryType,
        &["memory type", "ram type", "supported memory", "memory", "ddr", "memory standard"],
        Some(P_DDR),
        Canonicalizer::Ddr,
    ),
    (
        Attribute::MemorySpeed,
        &["memory speed", "supported memory speed", "ram speed", "max memory speed", "memory frequency"],
        Some(P_MEMORY_SPEED),
        Canonicalizer::Frequency(Unit::Megahertz),
    ),
    (
        Attribute::MemoryCapacity,
        &["max memory", "maximum memory", "max ram", "memory capacity", "max memory capacity"],
        Some(P_SIZE),
        Canonicalizer::Size(SpecKind::MemorySize, Unit::Gigabytes),
    ),
    (
        Attribute::MemoryVoltage,
        &["memory voltage", "dram voltage", "ram voltage", "voltage"],
        Some(P_VOLTS),
        Canonicalizer::Volts,
    ),
    (
        Attribute::Ecc,
        &["ecc", "ecc support", "ecc memory", "supports ecc"],
        None,
        Canonicalizer::Text,
    ),
];

const RAM_ATTRIBUTES: &[Row] = &[
    (
        Attribute::MemoryType,
        &["type", "memory type", "ram type", "ddr", "standard", "ddr version"],
        Some(P_DDR),
        Canonicalizer::Ddr,
    ),
    (
        Attribute::MemoryCapacity,
        &["capacity", "size", "memory size", "total capacity", "memory", "kit capacity"],
        Some(P_KIT_SIZE),
        Canonicalizer::KitSize,
    ),
    (
        Attribute::MemorySpeed,
        &["speed", "memory speed", "frequency", "clock", "data rate", "ram speed"],
        Some(P_MEMORY_SPEED),
        Canonicalizer::Frequency(Unit::Megahertz),
    ),
    (
        Attribute::Latency,
        &["cas latency", "cl timing", "timing", "timings", "cl", "latency"],
        Some(P_LATENCY),
        Canonicalizer::Latency,
    ),
    (
        Attribute::MemoryVoltage,
        &["voltage", "dram voltage", "memory voltage", "vdimm"],
        Some(P_VOLTS),
        Canonicalizer::Volts,
    ),
    (
        Attribute::Ecc,
        &["ecc", "error correction", "ecc support"],
        None,
        Canonicalizer::Text,
    ),
];

const GPU_ATTRIBUTES: &[Row] = &[
    (
        Attribute::Vram,
        &["vram", "memory", "memory size", "video memory", "gpu memory"],
        Some(P_SIZE),
        Canonicalizer::Size(SpecKind::MemorySize, Unit::Gigabytes),
    ),
    (
        Attribute::CoreClock,
        &["core clock", "base clock", "gpu clock", "clock speed", "boost clock", "clock"],
        Some(P_FREQ),
        Canonicalizer::Frequency(Unit::Megahertz),
    ),
    (
        Attribute::Tdp,
        &["tdp", "tgp", "power", "board power", "total board power"],
        Some(P_WATTS),
        Canonicalizer::Watts,
    ),
];

const PSU_ATTRIBUTES: &[Row] = &[
    (
        Attribute::Wattage,
        &["wattage", "power", "output", "capacity", "max power", "rated power", "output power"],
        Some(P_WATTS),
        Canonicalizer::Watts,
    ),
    (
        Attribute::Efficiency,
        &["efficiency", "80 plus", "80+", "certification", "efficiency rating", "rating"],
        None,
        Canonicalizer::Text,
    ),
];

const STORAGE_ATTRIBUTES: &[Row] = &[(
    Attribute::StorageCapacity,
    &["capacity", "size", "storage", "storage capacity"],
    Some(P_SIZE),
    Canonicalizer::Size(SpecKind::StorageSize, Unit::Gigabytes),
)];

const COOLER_ATTRIBUTES: &[Row] = &[
    SOCKET_ROW,
    (
        Attribute::Tdp,
        &["tdp", "tdp rating", "max tdp", "cooling capacity"],
        Some(P_WATTS),
        Canonicalizer::Watts,
    ),
];

const TABLE_ROWS: &[(Category, &[Row])] = &[
    (Category::Cpu, CPU_ATTRIBUTES),
    (Category::Motherboard, MOTHERBOARD_ATTRIBUTES),
    (Category::Ram, RAM_ATTRIBUTES),
    (Category::Gpu, GPU_ATTRIBUTES),
    (Category::Psu, PSU_ATTRIBUTES),
    (Category::Storage, STORAGE_ATTRIBUTES),
    (Category::CpuCooler, COOLER_ATTRIBUTES),
];

/// One compiled row of the attribute table.
#[derive(Debug)]
pub struct AttributeSpec {
    pub attribute: Attribute,
    pub aliases: &'static [&'static str],
    pattern: Option<Regex>,
    canonicalizer: Canonicalizer,
}

static TABLE: Lazy<HashMap<Category, Vec<AttributeSpec>>> = Lazy::new(|| {
    TABLE_ROWS
        .iter()
        .map(|(category, rows)| {
            let specs = rows
                .iter()
                .map(|&(attribute, aliases, pattern, canonicalizer)| AttributeSpec {
                    attribute,
                    aliases,
                    pattern: pattern.map(|p| Regex::new(p).unwrap()),
                    canonicalizer,
                })
                .collect();
            (*category, specs)
        })
        .collect()
});

static SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(P_SIZE).unwrap());
static FREQ: Lazy<Regex> = Lazy::new(|| Regex::new(P_FREQ).unwrap());
static CORES: Lazy<Regex> = Lazy::new(|| Regex::new(P_CORES).unwrap());
static THREADS: Lazy<Regex> = Lazy::new(|| Regex::new(P_THREADS).unwrap());
static WATTS: Lazy<Regex> = Lazy::new(|| Regex::new(P_WATTS).unwrap());

/// Lowercase a specification name and collapse punctuation so that
/// `"CAS_Latency"`, `"cas-latency"` and `"CAS Latency:"` compare equal.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '+' || c == '#' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find the table row a specification name refers to for `category`.
pub fn lookup(category: Category, name: &str) -> Option<&'static AttributeSpec> {
    let key = name_key(name);
    TABLE
        .get(&category)?
        .iter()
        .find(|spec| spec.aliases.contains(&key.as_str()))
}

/// Table row for a known attribute of `category`.
pub fn attribute_spec(category: Category, attribute: Attribute) -> Option<&'static AttributeSpec> {
    TABLE
        .get(&category)?
        .iter()
        .find(|spec| spec.attribute == attribute)
}

/// Normalize one `{name, value}` pair of a component in `category`.
pub fn normalize(category: Category, name: &str, raw: &str) -> NormalizedSpec {
    match lookup(category, name) {
        Some(spec) => spec.normalize(raw),
        None => sniff(name, raw).unwrap_or_else(|| NormalizedSpec::Unclassified {
            raw: raw.to_string(),
        }),
    }
}

impl AttributeSpec {
    pub fn matches_name(&self, name: &str) -> bool {
        self.aliases.contains(&name_key(name).as_str())
    }

    pub fn normalize(&self, raw: &str) -> NormalizedSpec {
        match self.canonicalizer {
            Canonicalizer::Text => NormalizedSpec::Unclassified {
                raw: raw.to_string(),
            },
            Canonicalizer::Socket => {
                let id = canonical_socket(raw);
                if id.is_empty() {
                    NormalizedSpec::Unclassified {
                        raw: raw.to_string(),
                    }
                } else {
                    NormalizedSpec::Identifier {
                        kind: SpecKind::Socket,
                        id,
                    }
                }
            }
            canonicalizer => {
                let caps = self
                    .pattern
                    .as_ref()
                    .and_then(|p| p.captures(raw))
                    .or_else(|| FIRST_NUMBER.captures(raw));
                canonicalizer.classify(caps.as_ref())
            }
        }
    }
}

impl Canonicalizer {
    fn classify(self, caps: Option<&Captures<'_>>) -> NormalizedSpec {
        let num = caps
            .and_then(|c| c.name("num"))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .unwrap_or(0.0);
        let unit = caps
            .and_then(|c| c.name("unit"))
            .map(|m| m.as_str().to_ascii_lowercase());
        let unit = unit.as_deref();
        let kit = caps
            .and_then(|c| c.name("kit"))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|k| *k >= 1.0)
            .unwrap_or(1.0);

        let (kind, magnitude, unit) = match self {
            Canonicalizer::Size(kind, target) => (kind, size_in(num, unit, target), target),
            Canonicalizer::KitSize => (
                SpecKind::MemorySize,
                size_in(num, unit, Unit::Gigabytes) * kit,
                Unit::Gigabytes,
            ),
            Canonicalizer::Frequency(target) => {
                (SpecKind::Frequency, frequency_in(num, unit, target), target)
            }
            Canonicalizer::Count(kind, target) => (kind, num, target),
            Canonicalizer::Watts => {
                let watts = if unit == Some("kw") { num * 1000.0 } else { num };
                (SpecKind::Wattage, watts, Unit::Watts)
            }
            Canonicalizer::Volts => {
                // Unit-less "1350" is a millivolt figure
                let millivolts = unit == Some("mv") || (unit.is_none() && num > 10.0);
                let volts = if millivolts { num / 1000.0 } else { num };
                (SpecKind::Voltage, volts, Unit::Volts)
            }
            Canonicalizer::Ddr => (SpecKind::DdrVersion, num, Unit::Ddr),
            Canonicalizer::Latency => (SpecKind::Latency, num, Unit::Cycles),
            Canonicalizer::Socket | Canonicalizer::Text => unreachable!("handled by caller"),
        };

        NormalizedSpec::Classified {
            kind,
            magnitude: round6(magnitude),
            unit,
        }
    }
}

fn size_in(num: f64, unit: Option<&str>, target: Unit) -> f64 {
    let gigabytes = match unit {
        Some("tb") => num * 1024.0,
        Some("gb") => num,
        Some("mb") => num / 1024.0,
        Some("kb") => num / (1024.0 * 1024.0),
        _ => return num,
    };
    gigabytes * Unit::Gigabytes.factor_to(target).unwrap_or(1.0)
}

fn frequency_in(num: f64, unit: Option<&str>, target: Unit) -> f64 {
    let source = match unit {
        Some("ghz") => Unit::Gigahertz,
        Some("mhz") | Some("mt/s") => Unit::Megahertz,
        // Unit-less: "3600" is a MHz figure, "3.6" a GHz one
        _ if target == Unit::Gigahertz && num >= 100.0 => Unit::Megahertz,
        _ if target == Unit::Megahertz && num > 0.0 && num < 10.0 => Unit::Gigahertz,
        _ => target,
    };
    num * source.factor_to(target).unwrap_or(1.0)
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Generic unit sniffing for names the table does not know.
fn sniff(name: &str, raw: &str) -> Option<NormalizedSpec> {
    const STORAGE: &[&str] = &["storage", "ssd", "hdd", "nvme", "drive", "disk"];
    const MEMORY: &[&str] = &["memory", "ram", "vram", "cache"];
    const FREQUENCY: &[&str] = &["clock", "frequency", "ghz", "mhz"];
    const POWER: &[&str] = &["watt", "power", "psu"];

    // Word-prefix match: "threads" hits "thread", "frame" does not hit "ram"
    fn has(text: &str, words: &[&str]) -> bool {
        text.split_whitespace()
            .any(|t| words.iter().any(|w| t.starts_with(w)))
    }

    let name = name_key(name);
    let value = name_key(raw);

    let from_name = if has(&name, STORAGE) {
        Some(SpecKind::StorageSize)
    } else if has(&name, MEMORY) {
        Some(SpecKind::MemorySize)
    } else if has(&name, FREQUENCY) {
        Some(SpecKind::Frequency)
    } else if has(&name, &["thread"]) {
        Some(SpecKind::ThreadCount)
    } else if has(&name, &["core"]) {
        Some(SpecKind::CoreCount)
    } else if has(&name, POWER) {
        Some(SpecKind::Wattage)
    } else {
        None
    };

    let kind = from_name.or_else(|| {
        let size_unit = SIZE
            .captures(raw)
            .and_then(|c| c.name("unit"))
            .map(|m| m.as_str().to_ascii_lowercase());
        if size_unit.as_deref() == Some("tb") || has(&value, STORAGE) {
            Some(SpecKind::StorageSize)
        } else if FREQ.is_match(raw) {
            Some(SpecKind::Frequency)
        } else if size_unit.is_some() {
            Some(SpecKind::MemorySize)
        } else if THREADS.is_match(raw) && has(&value, &["thread"]) {
            Some(SpecKind::ThreadCount)
        } else if CORES.is_match(raw) && has(&value, &["core"]) {
            Some(SpecKind::CoreCount)
        } else if WATTS.is_match(raw) {
            Some(SpecKind::Wattage)
        } else {
            None
        }
    })?;

    let (pattern, canonicalizer): (&Regex, _) = match kind {
        SpecKind::StorageSize | SpecKind::MemorySize => {
            (&*SIZE, Canonicalizer::Size(kind, Unit::Gigabytes))
        }
        SpecKind::Frequency => (&*FREQ, Canonicalizer::Frequency(Unit::Gigahertz)),
        SpecKind::ThreadCount => (&*THREADS, Canonicalizer::Count(kind, Unit::Threads)),
        SpecKind::CoreCount => (&*CORES, Canonicalizer::Count(kind, Unit::Cores)),
        _ => (&*WATTS, Canonicalizer::Watts),
    };

    let caps = match pattern.captures(raw) {
        Some(caps) => Some(caps),
        // A keyword in the name alone does not make "DDR4" a size; only bare counts pass
        None if from_name.is_some() => {
            let bare = raw.trim();
            let is_count = matches!(kind, SpecKind::CoreCount | SpecKind::ThreadCount);
            if !is_count || bare.parse::<u32>().is_err() {
                return None;
            }
            FIRST_NUMBER.captures(bare)
        }
        None => FIRST_NUMBER.captures(raw),
    };
    Some(canonicalizer.classify(caps.as_ref()))
}

/// Chipset and shorthand spellings that show up in socket fields.
const SOCKET_ALIASES: &[(&str, &[&str])] = &[
    (
        "am4",
        &["a320", "b350", "x370", "b450", "x470", "a520", "b550", "x570"],
    ),
    (
        "am5",
        &["a620", "b650", "b650e", "x670", "x670e", "b840", "b850", "x870", "x870e"],
    ),
    ("tr4", &["x399"]),
    ("strx4", &["trx40"]),
    ("str5", &["trx50"]),
    (
        "lga1151",
        &["z370", "h370", "b360", "h310", "z390", "b365", "q370", "z270", "b250", "h270"],
    ),
    (
        "lga1200",
        &["z490", "h470", "b460", "h410", "z590", "h570", "b560", "h510"],
    ),
    (
        "lga1700",
        &["z690", "h670", "b660", "h610", "z790", "h770", "b760"],
    ),
    ("lga1851", &["z890", "b860", "h810"]),
];

const SOCKET_NOISE: &[&str] = &["socket", "cpu", "intel", "amd"];

/// Canonical socket id: `"Socket AM4"`, `"am-4"` and `"B450"` all become `am4`,
/// `"FCLGA1700"`, `"LGA 1700"` and `"1700"` become `lga1700`.
pub fn canonical_socket(raw: &str) -> String {
    let compact: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect();

    let mut s = compact.as_str();
    loop {
        let before = s.len();
        for noise in SOCKET_NOISE {
            s = s.strip_prefix(noise).unwrap_or(s);
            s = s.strip_suffix(noise).unwrap_or(s);
        }
        if s.len() == before {
            break;
        }
    }

    let token = s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .find(|t| !t.is_empty())
        .unwrap_or("");

    if let Some(pins) = token.strip_prefix("fclga") {
        return format!("lga{pins}");
    }
    if let Some((socket, _)) = SOCKET_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&token))
    {
        return socket.to_string();
    }
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return format!("lga{token}");
    }
    token.to_string()
}

impl Component {
    /// First specification whose name refers to `attribute` in this component's category.
    pub fn spec_for(&self, attribute: Attribute) -> Option<&Specification> {
        let spec = attribute_spec(self.category, attribute)?;
        self.specifications
            .iter()
            .find(|s| spec.matches_name(&s.name))
    }

    /// Raw text of `attribute`, trimmed; `None` when absent or blank.
    pub fn attribute_text(&self, attribute: Attribute) -> Option<&str> {
        self.spec_for(attribute)
            .map(|s| s.value.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn normalized(&self, attribute: Attribute) -> Option<NormalizedSpec> {
        let spec = attribute_spec(self.category, attribute)?;
        self.attribute_text(attribute).map(|v| spec.normalize(v))
    }

    /// Positive magnitude of `attribute` in `unit`; zero or unparseable values count as absent.
    pub fn measure(&self, attribute: Attribute, unit: Unit) -> Option<f64> {
        self.normalized(attribute)
            .and_then(|n| n.magnitude_in(unit))
            .filter(|m| *m > 0.0)
    }
}
