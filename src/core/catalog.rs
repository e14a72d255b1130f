use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decorative categories that can be placed in the village.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    House,
    Stall,
    Sugarcane,
    Rangoli,
}

/// Fixed catalogue of things that can be tossed into the fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Offering {
    Popcorn,
    Peanuts,
    Rewari,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::House,
        ItemKind::Stall,
        ItemKind::Sugarcane,
        ItemKind::Rangoli,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ItemKind::House => "house",
            ItemKind::Stall => "stall",
            ItemKind::Sugarcane => "sugarcane",
            ItemKind::Rangoli => "rangoli",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::House => "Big House",
            ItemKind::Stall => "Mela Stall",
            ItemKind::Sugarcane => "Sugarcane",
            ItemKind::Rangoli => "Rangoli",
        }
    }

    /// Happiness awarded when one is placed.
    pub fn points(self) -> f64 {
        match self {
            ItemKind::House => 15.0,
            ItemKind::Stall => 12.0,
            ItemKind::Sugarcane => 8.0,
            ItemKind::Rangoli => 10.0,
        }
    }

    /// Character drawn on the village canvas.
    pub fn glyph(self) -> char {
        match self {
            ItemKind::House => 'H',
            ItemKind::Stall => 'S',
            ItemKind::Sugarcane => 'Y',
            ItemKind::Rangoli => '*',
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ItemKind::House => "🏠",
            ItemKind::Stall => "🎪",
            ItemKind::Sugarcane => "🎋",
            ItemKind::Rangoli => "🪔",
        }
    }
}

impl Offering {
    pub const ALL: [Offering; 3] = [Offering::Popcorn, Offering::Peanuts, Offering::Rewari];

    pub fn tag(self) -> &'static str {
        match self {
            Offering::Popcorn => "popcorn",
            Offering::Peanuts => "peanuts",
            Offering::Rewari => "rewari",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Offering::Popcorn => "Popcorn",
            Offering::Peanuts => "Peanuts",
            Offering::Rewari => "Rewari",
        }
    }

    /// Base happiness before the combo multiplier is applied.
    pub fn points(self) -> f64 {
        match self {
            Offering::Popcorn => 2.0,
            Offering::Peanuts => 2.0,
            Offering::Rewari => 4.0,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Offering::Popcorn => "🍿",
            Offering::Peanuts => "🥜",
            Offering::Rewari => "🍬",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Offering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown catalogue tag '{}'", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for ItemKind {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl FromStr for Offering {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Offering::ALL
            .into_iter()
            .find(|offering| offering.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_points_table() {
        assert_eq!(ItemKind::House.points(), 15.0);
        assert_eq!(ItemKind::Stall.points(), 12.0);
        assert_eq!(ItemKind::Sugarcane.points(), 8.0);
        assert_eq!(ItemKind::Rangoli.points(), 10.0);
    }

    #[test]
    fn test_offering_points_table() {
        assert_eq!(Offering::Popcorn.points(), 2.0);
        assert_eq!(Offering::Peanuts.points(), 2.0);
        assert_eq!(Offering::Rewari.points(), 4.0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ItemKind::House.to_string(), "Big House");
        assert_eq!(ItemKind::Stall.label(), "Mela Stall");
        assert_eq!(Offering::Rewari.to_string(), "Rewari");
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let mut glyphs: Vec<char> = ItemKind::ALL.iter().map(|k| k.glyph()).collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), ItemKind::ALL.len());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("house".parse::<ItemKind>(), Ok(ItemKind::House));
        assert_eq!(" Rangoli ".parse::<ItemKind>(), Ok(ItemKind::Rangoli));
        assert_eq!("REWARI".parse::<Offering>(), Ok(Offering::Rewari));
        assert!("palace".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&ItemKind::Sugarcane).unwrap();
        assert_eq!(json, "\"sugarcane\"");

        let offering: Offering = serde_json::from_str("\"peanuts\"").unwrap();
        assert_eq!(offering, Offering::Peanuts);
    }
}
