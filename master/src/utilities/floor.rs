use std::fmt;

/// A floor the car can stand on, 0 through 99.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Floor(u8);

impl Floor {
    pub const MAX: u8 = 99;

    pub fn new(value: u8) -> Option<Self> {
        if value <= Floor::MAX {
            Some(Floor(value))
        } else {
            None
        }
    }

    /// Clamps to the top floor.
    pub fn saturating(value: u8) -> Self {
        Floor(value.min(Floor::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// One floor closer to `target`, or `self` when already there.
    pub fn step_toward(self, target: Floor) -> Floor {
        if self < target {
            Floor(self.0 + 1)
        } else if self > target {
            Floor(self.0 - 1)
        } else {
            self
        }
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
