//! Structural strategy classification of a trade's legs.
//!
//! The classifier maps a leg set to one of four archetypes. Rules apply in
//! order of leg count:
//!
//! | Legs | Archetype |
//! |------|-----------|
//! | 0 | `other` |
//! | 1 | `single` |
//! | 2 | `verticalSpread` if both legs share expiry and option type |
//! | 4 | `ironCondor` if one expiry, both long and short, both call and put |
//! | 3, 5+ | `other` |
//!
//! The two-leg rule does not look at positions: two long calls at different
//! strikes on the same expiry classify as a vertical spread.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::trade::{LegPosition, OptionLeg, OptionType};

/// Structural label the classifier assigns to a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Archetype {
    Single,
    VerticalSpread,
    IronCondor,
    Other,
}

impl Archetype {
    /// Wire name of the archetype.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::VerticalSpread => "verticalSpread",
            Self::IronCondor => "ironCondor",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an ordered leg set.
#[must_use]
pub fn classify(legs: &[OptionLeg]) -> Archetype {
    match legs {
        [] => Archetype::Other,
        [_] => Archetype::Single,
        [a, b] => {
            if a.expiry == b.expiry && a.option_type == b.option_type {
                Archetype::VerticalSpread
            } else {
                Archetype::Other
            }
        }
        [first, ..] if legs.len() == 4 => {
            let same_expiry = legs.iter().all(|leg| leg.expiry == first.expiry);
            let has = |pred: fn(&OptionLeg) -> bool| legs.iter().any(pred);
            let mixed_positions = has(|l| l.position == LegPosition::Long)
                && has(|l| l.position == LegPosition::Short);
            let mixed_types =
                has(|l| l.option_type == OptionType::Call) && has(|l| l.option_type == OptionType::Put);

            if same_expiry && mixed_positions && mixed_types {
                Archetype::IronCondor
            } else {
                Archetype::Other
            }
        }
        _ => Archetype::Other,
    }
}
