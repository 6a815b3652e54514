//! Check states.

use core::fmt;

/// Outcome classification of a single evaluation.
///
/// `State` deliberately has no `Ord` implementation: the numeric codes
/// (0..=3) are a wire convention, not a severity order. Use
/// [`State::worse`] / [`State::worst`] when combining states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum State {
    #[default]
    Ok,
    Warn,
    Crit,
    Unknown,
}

impl State {
    /// Numeric state code as understood by monitoring cores (0 = OK .. 3 = UNKNOWN).
    pub const fn code(self) -> u8 {
        match self {
            State::Ok => 0,
            State::Warn => 1,
            State::Crit => 2,
            State::Unknown => 3,
        }
    }

    /// Inverse of [`State::code`].
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(State::Ok),
            1 => Some(State::Warn),
            2 => Some(State::Crit),
            3 => Some(State::Unknown),
            _ => None,
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            State::Ok => "OK",
            State::Warn => "WARN",
            State::Crit => "CRIT",
            State::Unknown => "UNKNOWN",
        }
    }

    /// Marker appended to summary texts of non-OK results.
    pub fn marker(&self) -> &'static str {
        match self {
            State::Ok => "",
            State::Warn => "(!)",
            State::Crit => "(!!)",
            State::Unknown => "(?)",
        }
    }

    /// Rank used only for aggregation: OK < UNKNOWN < WARN < CRIT.
    ///
    /// UNKNOWN outranks OK but never a concrete WARN or CRIT, so it only
    /// surfaces when nothing else could be determined.
    const fn aggregation_rank(self) -> u8 {
        match self {
            State::Ok => 0,
            State::Unknown => 1,
            State::Warn => 2,
            State::Crit => 3,
        }
    }

    /// The worse of two states under the aggregation order.
    pub fn worse(self, other: State) -> State {
        if other.aggregation_rank() > self.aggregation_rank() {
            other
        } else {
            self
        }
    }

    /// The worst state of an iterator, or `None` when it is empty.
    pub fn worst<I>(states: I) -> Option<State>
    where
        I: IntoIterator<Item = State>,
    {
        states.into_iter().reduce(State::worse)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, State::Ok)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for state in [State::Ok, State::Warn, State::Crit, State::Unknown] {
            assert_eq!(State::from_code(state.code()), Some(state));
        }
        assert_eq!(State::from_code(4), None);
    }

    #[test]
    fn crit_beats_everything() {
        assert_eq!(State::Crit.worse(State::Unknown), State::Crit);
        assert_eq!(State::Unknown.worse(State::Crit), State::Crit);
        assert_eq!(State::Warn.worse(State::Crit), State::Crit);
    }

    #[test]
    fn unknown_only_beats_ok() {
        assert_eq!(State::Ok.worse(State::Unknown), State::Unknown);
        assert_eq!(State::Unknown.worse(State::Warn), State::Warn);
        assert_eq!(State::Warn.worse(State::Unknown), State::Warn);
    }

    #[test]
    fn worst_of_empty_is_none() {
        assert_eq!(State::worst(core::iter::empty()), None);
    }

    #[test]
    fn worst_of_mixed() {
        let states = [State::Ok, State::Unknown, State::Warn, State::Ok];
        assert_eq!(State::worst(states), Some(State::Warn));
    }

    #[test]
    fn display_uses_symbol() {
        assert_eq!(alloc::format!("{}", State::Crit), "CRIT");
        assert_eq!(State::Warn.marker(), "(!)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_uppercase() {
        let json = serde_json::to_string(&State::Unknown).unwrap();
        assert_eq!(json, "\"UNKNOWN\"");
    }
}
