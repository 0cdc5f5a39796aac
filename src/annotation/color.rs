use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Alpha applied to the background wash of a highlighted entity.
pub const WASH_ALPHA: u8 = 0x40;

pub const FALLBACK_COLOR: Rgb = Rgb::new(0x86, 0x8e, 0x96);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn hex(code: u32) -> Self {
        Self::new((code >> 16) as u8, (code >> 8) as u8, code as u8)
    }

    /// Opaque color for borders and badges.
    pub fn emphasis(self) -> Rgba {
        Rgba {
            base: self,
            alpha: 0xff,
        }
    }

    /// Translucent color for background highlighting.
    pub fn wash(self) -> Rgba {
        Rgba {
            base: self,
            alpha: WASH_ALPHA,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A base color plus alpha. Displays as CSS hex, `#rrggbb` when opaque and
/// `#rrggbbaa` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub base: Rgb,
    pub alpha: u8,
}

impl Rgba {
    pub fn is_opaque(&self) -> bool {
        self.alpha == 0xff
    }

    pub fn css_rgba(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.2})",
            self.base.r,
            self.base.g,
            self.base.b,
            f32::from(self.alpha) / 255.0
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}{:02x}", self.base, self.alpha)
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every label either analyzer view knows about. Shared labels have a single
/// color across profiles.
const PALETTE: &[(&str, Rgb)] = &[
    ("APT", Rgb::hex(0xe03131)),
    ("THREAT_ACTOR", Rgb::hex(0xff6b6b)),
    ("MALWARE", Rgb::hex(0xee5a6f)),
    ("VULNERABILITY", Rgb::hex(0xf06595)),
    ("ATTACK_VECTOR", Rgb::hex(0xcc5de8)),
    ("TOOL", Rgb::hex(0x845ef7)),
    ("EXPLOIT", Rgb::hex(0xcc5de8)),
    ("METHOD", Rgb::hex(0x7950f2)),
    ("CAMPAIGN", Rgb::hex(0x5c7cfa)),
    ("SECTOR", Rgb::hex(0x5c7cfa)),
    ("INDICATOR", Rgb::hex(0x339af0)),
    ("LOCATION", Rgb::hex(0x339af0)),
    ("HASH", Rgb::hex(0x228be6)),
    ("IP", Rgb::hex(0x15aabf)),
    ("URL", Rgb::hex(0x12b886)),
    ("FILE", Rgb::hex(0x40c057)),
    ("SOFTWARE", Rgb::hex(0x82c91e)),
    ("INFRASTRUCTURE", Rgb::hex(0xfab005)),
];

const CYBER_LABELS: &[&str] = &[
    "APT",
    "THREAT_ACTOR",
    "MALWARE",
    "VULNERABILITY",
    "TOOL",
    "EXPLOIT",
    "METHOD",
    "CAMPAIGN",
    "INDICATOR",
    "HASH",
    "IP",
    "URL",
    "FILE",
    "SOFTWARE",
    "INFRASTRUCTURE",
];

const INLINE_LABELS: &[&str] = &[
    "THREAT_ACTOR",
    "MALWARE",
    "VULNERABILITY",
    "ATTACK_VECTOR",
    "TOOL",
    "SECTOR",
    "LOCATION",
];

/// Which subset of the palette a view recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorProfile {
    /// Labels emitted by the cyber-entity NER model, used by the dashboard.
    Cyber,
    /// The smaller set used by the inline analyzer view.
    Inline,
}

impl ColorProfile {
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            ColorProfile::Cyber => CYBER_LABELS,
            ColorProfile::Inline => INLINE_LABELS,
        }
    }

    pub fn recognizes(self, label: &str) -> bool {
        self.labels().contains(&label)
    }

    /// Base color for `label`, or [`FALLBACK_COLOR`] for anything this
    /// profile does not recognize.
    pub fn color_for(self, label: &str) -> Rgb {
        if !self.recognizes(label) {
            return FALLBACK_COLOR;
        }
        palette_color(label).unwrap_or(FALLBACK_COLOR)
    }
}

impl Default for ColorProfile {
    fn default() -> Self {
        ColorProfile::Cyber
    }
}

impl FromStr for ColorProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cyber" => Ok(ColorProfile::Cyber),
            "inline" => Ok(ColorProfile::Inline),
            _ => anyhow::bail!("unknown color profile: {}", s),
        }
    }
}

pub fn palette_color(label: &str) -> Option<Rgb> {
    PALETTE
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, color)| *color)
}

/// Every label in the unified palette.
pub fn known_labels() -> impl Iterator<Item = &'static str> {
    PALETTE.iter().map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_label_same_color() {
        let first = ColorProfile::Cyber.color_for("MALWARE");
        let second = ColorProfile::Cyber.color_for("MALWARE");
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "#ee5a6f");
    }

    #[test]
    fn unknown_label_falls_back_to_gray() {
        assert_eq!(ColorProfile::Cyber.color_for("UNKNOWN_TAG"), FALLBACK_COLOR);
        assert_eq!(ColorProfile::Inline.color_for(""), FALLBACK_COLOR);
        assert_eq!(FALLBACK_COLOR.to_string(), "#868e96");
    }

    #[test]
    fn profiles_recognize_different_subsets() {
        assert_eq!(ColorProfile::Cyber.color_for("HASH").to_string(), "#228be6");
        assert_eq!(ColorProfile::Inline.color_for("HASH"), FALLBACK_COLOR);
        assert_eq!(ColorProfile::Inline.color_for("SECTOR").to_string(), "#5c7cfa");
        assert_eq!(ColorProfile::Cyber.color_for("SECTOR"), FALLBACK_COLOR);
    }

    #[test]
    fn shared_labels_agree_across_profiles() {
        for label in ColorProfile::Inline.labels() {
            if ColorProfile::Cyber.recognizes(label) {
                assert_eq!(
                    ColorProfile::Cyber.color_for(label),
                    ColorProfile::Inline.color_for(label)
                );
            }
        }
    }

    #[test]
    fn every_profile_label_is_in_the_palette() {
        for profile in [ColorProfile::Cyber, ColorProfile::Inline] {
            for label in profile.labels() {
                assert!(palette_color(label).is_some(), "{} missing", label);
            }
        }
        assert_eq!(known_labels().count(), 18);
    }

    #[test]
    fn wash_and_emphasis_derive_from_one_base() {
        let base = ColorProfile::Cyber.color_for("THREAT_ACTOR");
        assert_eq!(base.emphasis().to_string(), "#ff6b6b");
        assert_eq!(base.wash().to_string(), "#ff6b6b40");
        assert_eq!(base.wash().css_rgba(), "rgba(255, 107, 107, 0.25)");
    }
}
