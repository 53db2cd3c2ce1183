//! Weight/italic variant model and its parsing rules (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypiError;

/// Standard typographic weight scale, ordinals 100 through 900.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weight {
    Thin,
    ExtraLight,
    Light,
    Regular,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl Weight {
    pub const ALL: [Weight; 9] = [
        Weight::Thin,
        Weight::ExtraLight,
        Weight::Light,
        Weight::Regular,
        Weight::Medium,
        Weight::SemiBold,
        Weight::Bold,
        Weight::ExtraBold,
        Weight::Black,
    ];

    /// Numeric ordinal on the 100-900 scale.
    pub fn number(self) -> u16 {
        match self {
            Weight::Thin => 100,
            Weight::ExtraLight => 200,
            Weight::Light => 300,
            Weight::Regular => 400,
            Weight::Medium => 500,
            Weight::SemiBold => 600,
            Weight::Bold => 700,
            Weight::ExtraBold => 800,
            Weight::Black => 900,
        }
    }

    /// Only the nine defined ordinals are valid; everything else is rejected.
    pub fn from_number(number: u16) -> Option<Weight> {
        Weight::ALL.into_iter().find(|w| w.number() == number)
    }

    /// Canonical lowercase name used by the long print form.
    pub fn name(self) -> &'static str {
        match self {
            Weight::Thin => "thin",
            Weight::ExtraLight => "extralight",
            Weight::Light => "light",
            Weight::Regular => "regular",
            Weight::Medium => "medium",
            Weight::SemiBold => "semibold",
            Weight::Bold => "bold",
            Weight::ExtraBold => "extrabold",
            Weight::Black => "black",
        }
    }
}

/// A weight/italic combination, e.g. bold italic.
///
/// Variants order by weight ascending with upright before italic at equal
/// weight, which keeps listings deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontVariant {
    pub weight: Weight,
    pub italic: bool,
}

impl FontVariant {
    pub const fn new(weight: Weight, italic: bool) -> Self {
        FontVariant { weight, italic }
    }

    pub const fn regular() -> Self {
        FontVariant::new(Weight::Regular, false)
    }

    /// Long print form, e.g. `bold italic` or `regular`.
    pub fn long_name(&self) -> String {
        if self.italic {
            format!("{} italic", self.weight.name())
        } else {
            self.weight.name().to_string()
        }
    }
}

/// Canonical short form: the ordinal with a trailing `i` for italics,
/// e.g. `400` or `700i`. `parse` accepts every string printed here.
impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.weight.number(),
            if self.italic { "i" } else { "" }
        )
    }
}

impl FromStr for FontVariant {
    type Err = TypiError;

    /// Parse both print forms plus common aliases, case-insensitively.
    ///
    /// Accepted weight tokens are the numeric ordinals (with an optional
    /// trailing `i`) and names like `bold`, `normal`, `demibold` or `heavy`.
    /// A bare italic marker implies regular weight; an input without any
    /// recognizable token is an error.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim().to_ascii_lowercase();
        let invalid = || TypiError::InvalidVariant(input.trim().to_string());

        let mut italic = false;
        let mut weight: Option<Weight> = None;

        for raw in text.split([' ', '-', '_']).filter(|t| !t.is_empty()) {
            let mut token = raw;

            if matches!(token, "italic" | "oblique") {
                italic = true;
                continue;
            }

            // Glued forms such as "bolditalic" or "700italic".
            if let Some(stripped) = token
                .strip_suffix("italic")
                .or_else(|| token.strip_suffix("oblique"))
            {
                italic = true;
                token = stripped;
            }

            // Numeric short form "700i".
            if token.len() > 1
                && token.ends_with('i')
                && token[..token.len() - 1].bytes().all(|b| b.is_ascii_digit())
            {
                italic = true;
                token = &token[..token.len() - 1];
            }

            weight = Some(weight_from_token(token).ok_or_else(invalid)?);
        }

        match (weight, italic) {
            (Some(weight), italic) => Ok(FontVariant::new(weight, italic)),
            (None, true) => Ok(FontVariant::new(Weight::Regular, true)),
            (None, false) => Err(invalid()),
        }
    }
}

fn weight_from_token(token: &str) -> Option<Weight> {
    if token.bytes().all(|b| b.is_ascii_digit()) && !token.is_empty() {
        return token.parse::<u16>().ok().and_then(Weight::from_number);
    }

    match token {
        "thin" | "hairline" => Some(Weight::Thin),
        "extralight" | "ultralight" => Some(Weight::ExtraLight),
        "light" => Some(Weight::Light),
        "regular" | "normal" | "book" | "roman" | "plain" => Some(Weight::Regular),
        "medium" => Some(Weight::Medium),
        "semibold" | "demibold" | "demi" => Some(Weight::SemiBold),
        "bold" => Some(Weight::Bold),
        "extrabold" | "ultrabold" => Some(Weight::ExtraBold),
        "black" | "heavy" => Some(Weight::Black),
        _ => None,
    }
}

impl Serialize for FontVariant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FontVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
