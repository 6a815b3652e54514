//! Counter rates.
//!
//! Rates are derived from two observations of a monotonic counter: the one
//! stored by the previous run and the current one. Counters may wrap at
//! their width or reset when the device restarts; the engine recovers the
//! former and reports the latter as "collecting".

use checkwatch_types::{CounterSample, StoreEntry};
use tracing::debug;

use crate::store::ValueStore;

/// Width of a counter, which determines where it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterWidth {
    /// 32-bit counters, e.g. `ifInOctets`.
    Bits32,
    /// 64-bit counters, e.g. `ifHCInOctets`.
    Bits64,
    /// An explicit modulus.
    Modulus(u64),
    /// No known modulus: any decrease is a reset.
    #[default]
    Unbounded,
}

impl CounterWidth {
    /// The modulus the counter wraps at, if known.
    pub fn modulus(&self) -> Option<u128> {
        match *self {
            CounterWidth::Bits32 => Some(1u128 << 32),
            CounterWidth::Bits64 => Some(1u128 << 64),
            CounterWidth::Modulus(0) | CounterWidth::Unbounded => None,
            CounterWidth::Modulus(m) => Some(u128::from(m)),
        }
    }
}

/// Why no rate could be computed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collecting {
    /// No previous sample was stored.
    FirstSample,
    /// The clock did not advance since the previous sample.
    TimeNotAdvancing,
    /// The counter went backwards and could not be explained by a wrap.
    CounterReset,
}

impl Collecting {
    pub fn describe(&self) -> &'static str {
        match self {
            Collecting::FirstSample => "first sample",
            Collecting::TimeNotAdvancing => "time did not advance",
            Collecting::CounterReset => "counter reset",
        }
    }
}

/// Outcome of a rate computation.
///
/// `Collecting` is not an error: checks report it as OK and informational.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    PerSecond(f64),
    Collecting(Collecting),
}

impl Rate {
    pub fn per_second(&self) -> Option<f64> {
        match *self {
            Rate::PerSecond(rate) => Some(rate),
            Rate::Collecting(_) => None,
        }
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self, Rate::Collecting(_))
    }
}

/// Computes per-second rates with state kept in an injected [`ValueStore`].
///
/// # Example
///
/// ```rust
/// use checkwatch_engine::{Collecting, CounterWidth, MemoryStore, Rate, RateEngine};
///
/// let mut engine = RateEngine::new(MemoryStore::new()).with_width(CounterWidth::Modulus(2000));
///
/// assert_eq!(engine.rate("in.eth0", 100.0, 1000), Rate::Collecting(Collecting::FirstSample));
/// assert_eq!(engine.rate("in.eth0", 110.0, 1800), Rate::PerSecond(80.0));
/// assert_eq!(engine.rate("in.eth0", 120.0, 200), Rate::PerSecond(40.0));
/// ```
#[derive(Debug)]
pub struct RateEngine<S> {
    store: S,
    width: CounterWidth,
    max_rate: Option<f64>,
}

impl<S: ValueStore> RateEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            width: CounterWidth::default(),
            max_rate: None,
        }
    }

    /// Default counter width for [`RateEngine::rate`].
    pub fn with_width(mut self, width: CounterWidth) -> Self {
        self.width = width;
        self
    }

    /// Rates at or above this ceiling are treated as resets rather than wraps.
    pub fn with_max_rate(mut self, max_rate: Option<f64>) -> Self {
        self.max_rate = max_rate;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Rate of the counter stored under `key`, using the default width.
    pub fn rate(&mut self, key: &str, now: f64, value: u64) -> Rate {
        self.rate_with(key, now, value, self.width)
    }

    /// Rate of a sample, keyed by its metric key.
    pub fn sample_rate(&mut self, sample: &CounterSample, width: CounterWidth) -> Rate {
        self.rate_with(&sample.key(), sample.timestamp, sample.value, width)
    }

    /// Rate of the counter stored under `key` with an explicit width.
    ///
    /// The store entry is overwritten with `(now, value)` exactly once,
    /// whatever the outcome.
    pub fn rate_with(&mut self, key: &str, now: f64, value: u64, width: CounterWidth) -> Rate {
        let previous = self.store.get(key);
        self.store.set(key, StoreEntry::new(now, value));

        let Some(previous) = previous else {
            debug!(key, "First sample, collecting");
            return Rate::Collecting(Collecting::FirstSample);
        };

        let elapsed = now - previous.timestamp;
        if !(elapsed > 0.0) {
            debug!(key, elapsed, "Time did not advance");
            return Rate::Collecting(Collecting::TimeNotAdvancing);
        }

        if value >= previous.value {
            return Rate::PerSecond((value - previous.value) as f64 / elapsed);
        }

        match self.wrapped_rate(previous.value, value, elapsed, width) {
            Some(rate) => {
                debug!(key, previous = previous.value, value, "Counter wrapped");
                Rate::PerSecond(rate)
            }
            None => {
                debug!(key, previous = previous.value, value, "Counter reset");
                Rate::Collecting(Collecting::CounterReset)
            }
        }
    }

    fn wrapped_rate(&self, previous: u64, value: u64, elapsed: f64, width: CounterWidth) -> Option<f64> {
        let modulus = width.modulus()?;
        let (previous, value) = (u128::from(previous), u128::from(value));
        if previous >= modulus || value >= modulus {
            return None;
        }

        let delta = (modulus - previous) + value;
        let rate = delta as f64 / elapsed;
        match self.max_rate {
            Some(ceiling) if rate >= ceiling => None,
            _ => Some(rate),
        }
    }
}
