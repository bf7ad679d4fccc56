//! Signal-grid enumeration over Z' mass and invisible-fraction values.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_MASS_RANGE: MassRange = MassRange {
    start: 1000,
    stop: 4100,
    step: 100,
};

pub const DEFAULT_RINV_VALUES: [f64; 13] = [
    0.01, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.98, 0.99, 1.0,
];

/// Half-open arithmetic mass sequence: `start`, `start + step`, ... below `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MassRange {
    pub start: u32,
    pub stop: u32,
    pub step: u32,
}

impl MassRange {
    pub fn values(&self) -> impl Iterator<Item = u32> {
        let MassRange { start, step, .. } = *self;
        (0..self.len() as u32).map(move |index| start + step * index)
    }

    pub fn len(&self) -> usize {
        if self.step == 0 || self.start >= self.stop {
            return 0;
        }
        ((self.stop - self.start) as usize).div_ceil(self.step as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MassRange {
    fn default() -> Self {
        DEFAULT_MASS_RANGE
    }
}

/// Invisible fraction of the dark-shower decay. Values are carried as given;
/// integral values render with one fractional digit (`1.0`, never `1`) so
/// file names derived from different grid points cannot alias.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Rinv(pub f64);

impl Display for Rinv {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub mass: u32,
    pub rinv: Rinv,
}

/// Cartesian product of the mass sequence and the rinv list, enumerated
/// mass-major in the literal list order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParameterGrid {
    pub masses: MassRange,
    #[serde(rename = "rinvValues")]
    pub rinv_values: Vec<Rinv>,
}

impl ParameterGrid {
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        self.masses.values().flat_map(|mass| {
            self.rinv_values
                .iter()
                .map(move |&rinv| GridPoint { mass, rinv })
        })
    }

    pub fn len(&self) -> usize {
        self.masses.len() * self.rinv_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self {
            masses: DEFAULT_MASS_RANGE,
            rinv_values: DEFAULT_RINV_VALUES.iter().copied().map(Rinv).collect(),
        }
    }
}
