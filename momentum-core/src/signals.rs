//! Sign-threshold signal generation.
//!
//! Each bar's signal depends only on that bar's momentum: strictly positive
//! momentum is Long, anything else that is defined is Short. Zero momentum
//! is therefore Short. There is no hysteresis and no carried state.

use crate::indicators::MomentumSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional decision for one bar. Serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    Long,
    Short,
}

impl Signal {
    /// Classify one momentum value.
    pub fn from_momentum(momentum: f64) -> Self {
        if momentum > 0.0 {
            Signal::Long
        } else {
            Signal::Short
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Signal::Long => 1,
            Signal::Short => -1,
        }
    }
}

impl From<Signal> for i8 {
    fn from(s: Signal) -> Self {
        s.value()
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Signal::Long),
            -1 => Ok(Signal::Short),
            other => Err(format!("signal must be 1 or -1, got {other}")),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Signals aligned index-for-index with the momentum series.
pub type SignalSeries = Vec<Option<Signal>>;

/// Map every defined momentum value to a signal; undefined stays undefined.
pub fn generate(momentum: &MomentumSeries) -> SignalSeries {
    momentum
        .iter()
        .map(|m| m.map(Signal::from_momentum))
        .collect()
}
