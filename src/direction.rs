//! Sign types and the direction decision rules
//!
//! Each sign category maps to one of four comparison strategies over the
//! quadrant percentages. All comparisons are strict greater-than; ties fall
//! to the else branch of each rule. The tie-break sense is not uniform
//! across the rule families — that asymmetry matches the deployed behavior
//! and is preserved deliberately.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::detection::quadrant::{Quadrant, QuadrantMeasurements};
use crate::error::ClassifyError;

/// A directional verdict for one sign image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four comparison strategies over quadrant percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionRule {
    /// Compare LeftTop vs RightTop directly
    TopDominant,
    /// Compare the left column average vs the right column average
    AveragedSide,
    /// Compare LeftBottom vs LeftTop; the right column is never examined,
    /// for either mirror orientation of the sign
    VerticalAsymmetry,
    /// Compare the LeftTop/RightBottom diagonal vs the LeftBottom/RightTop
    /// diagonal
    DiagonalDominant,
}

/// Closed set of supported sign categories.
///
/// Unrecognized keys are rejected when parsing, so [`classify`] is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignType {
    /// Forced ahead-or-left
    AheadLeftOnly,
    /// Forced ahead-or-right
    AheadRightOnly,
    /// Advisory left turn ahead
    TurnLeftAhead,
    /// Advisory right turn ahead
    TurnRightAhead,
    /// Forced left turn
    LeftOnly,
    /// Forced right turn
    RightOnly,
    /// Proceed from the left
    KeepLeft,
    /// Proceed from the right
    KeepRight,
    /// Left turn prohibited
    NoLeftTurn,
    /// Right turn prohibited
    NoRightTurn,
}

impl SignType {
    pub fn rule(&self) -> DecisionRule {
        match self {
            SignType::AheadLeftOnly | SignType::AheadRightOnly => DecisionRule::TopDominant,
            SignType::TurnLeftAhead
            | SignType::TurnRightAhead
            | SignType::LeftOnly
            | SignType::RightOnly => DecisionRule::AveragedSide,
            SignType::KeepLeft | SignType::KeepRight => DecisionRule::VerticalAsymmetry,
            SignType::NoLeftTurn | SignType::NoRightTurn => DecisionRule::DiagonalDominant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::AheadLeftOnly => "ahead-left-only",
            SignType::AheadRightOnly => "ahead-right-only",
            SignType::TurnLeftAhead => "turn-left-ahead",
            SignType::TurnRightAhead => "turn-right-ahead",
            SignType::LeftOnly => "left-only",
            SignType::RightOnly => "right-only",
            SignType::KeepLeft => "keep-left",
            SignType::KeepRight => "keep-right",
            SignType::NoLeftTurn => "no-left-turn",
            SignType::NoRightTurn => "no-right-turn",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ahead-left-only" => Ok(SignType::AheadLeftOnly),
            "ahead-right-only" => Ok(SignType::AheadRightOnly),
            "turn-left-ahead" => Ok(SignType::TurnLeftAhead),
            "turn-right-ahead" => Ok(SignType::TurnRightAhead),
            "left-only" => Ok(SignType::LeftOnly),
            "right-only" => Ok(SignType::RightOnly),
            "keep-left" => Ok(SignType::KeepLeft),
            "keep-right" => Ok(SignType::KeepRight),
            "no-left-turn" => Ok(SignType::NoLeftTurn),
            "no-right-turn" => Ok(SignType::NoRightTurn),
            other => Err(ClassifyError::InvalidSignName {
                name: other.to_string(),
            }),
        }
    }
}

/// Apply the sign type's decision rule to the quadrant percentages.
///
/// Pure function: identical measurements and sign type always produce the
/// same verdict.
pub fn classify(measurements: &QuadrantMeasurements, sign_type: SignType) -> Direction {
    let left_top = measurements.percentage(Quadrant::LeftTop);
    let right_top = measurements.percentage(Quadrant::RightTop);
    let left_bottom = measurements.percentage(Quadrant::LeftBottom);
    let right_bottom = measurements.percentage(Quadrant::RightBottom);

    match sign_type.rule() {
        DecisionRule::TopDominant => {
            if left_top > right_top {
                Direction::Left
            } else {
                Direction::Right
            }
        }
        DecisionRule::AveragedSide => {
            let left = (left_top + left_bottom) / 2.0;
            let right = (right_top + right_bottom) / 2.0;
            if left > right {
                Direction::Left
            } else {
                Direction::Right
            }
        }
        DecisionRule::VerticalAsymmetry => {
            if left_bottom > left_top {
                Direction::Right
            } else {
                Direction::Left
            }
        }
        DecisionRule::DiagonalDominant => {
            let main_diagonal = (left_top + right_bottom) / 2.0;
            let anti_diagonal = (left_bottom + right_top) / 2.0;
            if main_diagonal > anti_diagonal {
                Direction::Right
            } else {
                Direction::Left
            }
        }
    }
}
