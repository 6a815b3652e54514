//! Threshold specifications.

/// Warning/critical bounds for a value, or none at all.
///
/// The bounds are not validated against each other: for an upper direction
/// `warn` is normally below `crit`, but the evaluator only applies its
/// comparison rules.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Levels {
    /// No evaluation; every value is OK.
    #[default]
    NoLevels,
    /// Fixed warning and critical bounds.
    Fixed { warn: f64, crit: f64 },
}

impl Levels {
    pub const fn fixed(warn: f64, crit: f64) -> Self {
        Levels::Fixed { warn, crit }
    }

    /// The `(warn, crit)` pair, if any.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match *self {
            Levels::NoLevels => None,
            Levels::Fixed { warn, crit } => Some((warn, crit)),
        }
    }
}

/// Which side of a bound is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Values at or above the bound are worse.
    Upper,
    /// Values at or below the bound are worse.
    Lower,
}
