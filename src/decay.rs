use crate::{
    error::{Error, Result},
    util::check_interval,
};

/// A strategy for decaying a hyperparameter one step at a time
///
/// Decay is applied to the current value rather than derived from a start value, so a
/// host may overwrite the value between steps and decay resumes from there.
pub trait Decay {
    /// Apply one step of decay to `value`
    fn decay(&self, value: f32) -> f32;

    /// Value after `t` steps of decay starting from `initial`
    fn evaluate(&self, initial: f32, t: u32) -> f32 {
        (0..t).fold(initial, |v, _| self.decay(v))
    }
}

fn validate_rate(rate: f32) -> Result<f32> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(Error::InvalidParameter {
            name: "rate",
            value: rate,
            reason: String::from("must be finite and non-negative"),
        })
    }
}

/// No decay at all
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constant;

impl Decay for Constant {
    fn decay(&self, value: f32) -> f32 {
        value
    }
}

/// v ← max(v * factor, floor)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multiplicative {
    factor: f32,
    floor: f32,
}

impl Multiplicative {
    pub fn new(factor: f32, floor: f32) -> Result<Self> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "factor",
                value: factor,
                reason: String::from("must be in the interval (0, 1]"),
            });
        }
        let floor = check_interval("floor", floor, 0.0, 1.0)?;
        Ok(Self { factor, floor })
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }
}

impl Default for Multiplicative {
    fn default() -> Self {
        Self {
            factor: 0.99,
            floor: 0.05,
        }
    }
}

impl Decay for Multiplicative {
    fn decay(&self, value: f32) -> f32 {
        (value * self.factor).max(self.floor)
    }
}

/// v ← max(v - rate, floor)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
    rate: f32,
    floor: f32,
}

impl Linear {
    pub fn new(rate: f32, floor: f32) -> Result<Self> {
        Ok(Self {
            rate: validate_rate(rate)?,
            floor: check_interval("floor", floor, 0.0, 1.0)?,
        })
    }
}

impl Decay for Linear {
    fn decay(&self, value: f32) -> f32 {
        (value - self.rate).max(self.floor)
    }
}

/// v ← floor + (v - floor) * e<sup>-rate</sup>
///
/// Approaches `floor` asymptotically. Values already below `floor` are left alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f32,
    floor: f32,
}

impl Exponential {
    pub fn new(rate: f32, floor: f32) -> Result<Self> {
        Ok(Self {
            rate: validate_rate(rate)?,
            floor: check_interval("floor", floor, 0.0, 1.0)?,
        })
    }
}

impl Decay for Exponential {
    fn decay(&self, value: f32) -> f32 {
        if value <= self.floor {
            return value;
        }
        self.floor + (value - self.floor) * (-self.rate).exp()
    }
}
