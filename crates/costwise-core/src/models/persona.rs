use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EstimationError;

/// Implements key/parse/display for a persona enum.
/// Parsing is case-insensitive and ignores surrounding whitespace;
/// anything else is rejected rather than defaulted.
macro_rules! persona_enum {
    ($name:ident, $field:literal, { $($variant:ident => $key:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable lowercase key used by the persona map.
            pub fn as_key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            /// Whether `key` names a value of this dimension.
            pub fn is_key(key: &str) -> bool {
                key.parse::<$name>().is_ok()
            }
        }

        impl FromStr for $name {
            type Err = EstimationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase();
                match normalized.as_str() {
                    $($key => Ok($name::$variant),)+
                    _ => Err(EstimationError::invalid_persona($field, s)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_key())
            }
        }
    };
}

/// Dwelling type; drives rent and utility sub-categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HousingType {
    #[serde(rename = "studio")]
    Studio,
    #[serde(rename = "1br")]
    OneBedroom,
    #[serde(rename = "2br")]
    TwoBedroom,
    #[serde(rename = "3br")]
    ThreeBedroom,
    #[serde(rename = "villa")]
    Villa,
}

persona_enum!(HousingType, "housing", {
    Studio => "studio",
    OneBedroom => "1br",
    TwoBedroom => "2br",
    ThreeBedroom => "3br",
    Villa => "villa",
});

/// Spending tier; drives the dining/entertainment/groceries mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifestyleTier {
    Budget,
    Standard,
    Premium,
}

persona_enum!(LifestyleTier, "lifestyle", {
    Budget => "budget",
    Standard => "standard",
    Premium => "premium",
});

/// How the household gets around; selects exactly one transport variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Public,
    Car,
    Rideshare,
}

persona_enum!(TransportMode, "transport", {
    Public => "public",
    Car => "car",
    Rideshare => "rideshare",
});

/// A household profile for one estimation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonaInput {
    pub housing: HousingType,
    pub lifestyle: LifestyleTier,
    pub transport: TransportMode,
}

impl PersonaInput {
    pub fn new(housing: HousingType, lifestyle: LifestyleTier, transport: TransportMode) -> Self {
        Self {
            housing,
            lifestyle,
            transport,
        }
    }

    /// Parse raw user input. The first unrecognized field is reported.
    pub fn parse(housing: &str, lifestyle: &str, transport: &str) -> Result<Self, EstimationError> {
        Ok(Self {
            housing: housing.parse()?,
            lifestyle: lifestyle.parse()?,
            transport: transport.parse()?,
        })
    }

    /// The key this persona has along `dimension`.
    pub fn key_for(&self, dimension: PersonaDimension) -> &'static str {
        match dimension {
            PersonaDimension::Housing => self.housing.as_key(),
            PersonaDimension::Lifestyle => self.lifestyle.as_key(),
            PersonaDimension::Transport => self.transport.as_key(),
        }
    }
}

impl fmt::Display for PersonaInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.housing, self.lifestyle, self.transport)
    }
}

/// A persona axis that a category rule can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaDimension {
    Housing,
    Lifestyle,
    Transport,
}

impl PersonaDimension {
    /// Whether `key` is a valid value along this dimension.
    pub fn accepts(self, key: &str) -> bool {
        match self {
            Self::Housing => HousingType::is_key(key),
            Self::Lifestyle => LifestyleTier::is_key(key),
            Self::Transport => TransportMode::is_key(key),
        }
    }
}

impl fmt::Display for PersonaDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Housing => "housing",
            Self::Lifestyle => "lifestyle",
            Self::Transport => "transport",
        })
    }
}
