// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves for segment interpolation.
//!
//! Every curve maps normalized progress in `[0, 1]` to a weight, with
//! `0 -> 0` and `1 -> 1`. Weights in between may leave `[0, 1]` for the
//! overshooting families (`Back`, `Elastic`).

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;
const BOUNCE_N1: f32 = 7.5625;
const BOUNCE_D1: f32 = 2.75;

/// Values that can be blended by an eased weight
pub trait Lerp {
    /// Blend from `self` towards `other`; `weight` 0 yields `self`, 1 yields `other`
    fn lerp(&self, other: &Self, weight: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, weight: f32) -> Self {
        self + (other - self) * weight
    }
}

/// Easing curve of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Easing {
    /// Constant rate
    #[default]
    Linear,
    /// Holds the source value until the segment ends
    Step,
    /// Quadratic, accelerating
    InQuad,
    /// Quadratic, decelerating
    OutQuad,
    /// Quadratic, both ends
    InOutQuad,
    /// Cubic, accelerating
    InCubic,
    /// Cubic, decelerating
    OutCubic,
    /// Cubic, both ends
    InOutCubic,
    /// Quartic, accelerating
    InQuart,
    /// Quartic, decelerating
    OutQuart,
    /// Quartic, both ends
    InOutQuart,
    /// Quintic, accelerating
    InQuint,
    /// Quintic, decelerating
    OutQuint,
    /// Quintic, both ends
    InOutQuint,
    /// Sinusoidal, accelerating
    InSine,
    /// Sinusoidal, decelerating
    OutSine,
    /// Sinusoidal, both ends
    InOutSine,
    /// Exponential, accelerating
    InExpo,
    /// Exponential, decelerating
    OutExpo,
    /// Exponential, both ends
    InOutExpo,
    /// Circular, accelerating
    InCirc,
    /// Circular, decelerating
    OutCirc,
    /// Circular, both ends
    InOutCirc,
    /// Pulls back before accelerating
    InBack,
    /// Overshoots the target before settling
    OutBack,
    /// Pulls back and overshoots
    InOutBack,
    /// Spring wind-up
    InElastic,
    /// Spring release
    OutElastic,
    /// Spring on both ends
    InOutElastic,
    /// Bounces before leaving
    InBounce,
    /// Bounces on arrival
    OutBounce,
    /// Bounces on both ends
    InOutBounce,
}

/// Chart names of every easing, in declaration order
const NAMES: [(Easing, &str); 32] = [
    (Easing::Linear, "easelinear"),
    (Easing::Step, "step"),
    (Easing::InQuad, "easeinquad"),
    (Easing::OutQuad, "easeoutquad"),
    (Easing::InOutQuad, "easeinoutquad"),
    (Easing::InCubic, "easeincubic"),
    (Easing::OutCubic, "easeoutcubic"),
    (Easing::InOutCubic, "easeinoutcubic"),
    (Easing::InQuart, "easeinquart"),
    (Easing::OutQuart, "easeoutquart"),
    (Easing::InOutQuart, "easeinoutquart"),
    (Easing::InQuint, "easeinquint"),
    (Easing::OutQuint, "easeoutquint"),
    (Easing::InOutQuint, "easeinoutquint"),
    (Easing::InSine, "easeinsine"),
    (Easing::OutSine, "easeoutsine"),
    (Easing::InOutSine, "easeinoutsine"),
    (Easing::InExpo, "easeinexpo"),
    (Easing::OutExpo, "easeoutexpo"),
    (Easing::InOutExpo, "easeinoutexpo"),
    (Easing::InCirc, "easeincirc"),
    (Easing::OutCirc, "easeoutcirc"),
    (Easing::InOutCirc, "easeinoutcirc"),
    (Easing::InBack, "easeinback"),
    (Easing::OutBack, "easeoutback"),
    (Easing::InOutBack, "easeinoutback"),
    (Easing::InElastic, "easeinelastic"),
    (Easing::OutElastic, "easeoutelastic"),
    (Easing::InOutElastic, "easeinoutelastic"),
    (Easing::InBounce, "easeinbounce"),
    (Easing::OutBounce, "easeoutbounce"),
    (Easing::InOutBounce, "easeinoutbounce"),
];

impl Easing {
    /// Get all easing curves
    pub fn all() -> impl Iterator<Item = Easing> {
        NAMES.iter().map(|(easing, _)| *easing)
    }

    /// Name used in chart files
    pub fn name(&self) -> &'static str {
        NAMES
            .iter()
            .find(|(easing, _)| easing == self)
            .map(|(_, name)| *name)
            .unwrap_or("easelinear")
    }

    /// Weight of the curve at progress `t`, clamped to `[0, 1]` first.
    ///
    /// NaN progress is treated as 0.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::Step => 0.0,
            Easing::InQuad => t * t,
            Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::InOutQuad => in_out(t, |t| t * t),
            Easing::InCubic => t.powi(3),
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::InOutCubic => in_out(t, |t| t.powi(3)),
            Easing::InQuart => t.powi(4),
            Easing::OutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::InOutQuart => in_out(t, |t| t.powi(4)),
            Easing::InQuint => t.powi(5),
            Easing::OutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::InOutQuint => in_out(t, |t| t.powi(5)),
            Easing::InSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::OutSine => (t * PI / 2.0).sin(),
            Easing::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::InExpo => 2f32.powf(10.0 * t - 10.0),
            Easing::OutExpo => 1.0 - 2f32.powf(-10.0 * t),
            Easing::InOutExpo => in_out(t, |t| 2f32.powf(10.0 * t - 10.0)),
            Easing::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Easing::OutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::InOutCirc => in_out(t, |t| 1.0 - (1.0 - t * t).sqrt()),
            Easing::InBack => BACK_C3 * t.powi(3) - BACK_C1 * t * t,
            Easing::OutBack => {
                1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
            }
            Easing::InOutBack => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2) + 2.0)
                        / 2.0
                }
            }
            Easing::InElastic => {
                -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
            }
            Easing::OutElastic => {
                2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
            }
            Easing::InOutElastic => {
                if t < 0.5 {
                    -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
                } else {
                    (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
                        + 1.0
                }
            }
            Easing::InBounce => 1.0 - bounce_out(1.0 - t),
            Easing::OutBounce => bounce_out(t),
            Easing::InOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }

    /// Blend `from` towards `to` at progress `t` along this curve
    pub fn ease<V: Lerp>(&self, from: &V, to: &V, t: f32) -> V {
        from.lerp(to, self.apply(t))
    }
}

/// Mirror an accelerating curve into an in-out curve
fn in_out(t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    if t < 0.5 {
        ease_in(2.0 * t) / 2.0
    } else {
        1.0 - ease_in(2.0 - 2.0 * t) / 2.0
    }
}

fn bounce_out(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984375
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown easing name in chart data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown easing: {0}")]
pub struct ParseEasingError(pub String);

impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if lowered == "easestep" {
            return Ok(Easing::Step);
        }
        NAMES
            .iter()
            .find(|(_, name)| *name == lowered)
            .map(|(easing, _)| *easing)
            .ok_or_else(|| ParseEasingError(s.to_string()))
    }
}

impl TryFrom<String> for Easing {
    type Error = ParseEasingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for &'static str {
    fn from(easing: Easing) -> Self {
        easing.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in Easing::all() {
            assert_eq!(easing.apply(0.0), 0.0, "{easing} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing} at 1");
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        for easing in Easing::all() {
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.5), 1.0);
            assert_eq!(easing.apply(f32::NAN), 0.0);
        }
    }

    #[test]
    fn test_midpoints() {
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
        assert_eq!(Easing::InQuad.apply(0.5), 0.25);
        assert_eq!(Easing::OutQuad.apply(0.5), 0.75);
        assert!((Easing::InOutQuad.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::InOutCubic.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::InOutSine.apply(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(Easing::Step.apply(0.99), 0.0);
    }

    #[test]
    fn test_monotonic_families_grow() {
        let monotonic = [
            Easing::Linear,
            Easing::InQuad,
            Easing::OutQuad,
            Easing::InOutQuad,
            Easing::InCubic,
            Easing::OutCubic,
            Easing::InOutQuart,
            Easing::OutQuint,
            Easing::InSine,
            Easing::OutExpo,
            Easing::InOutCirc,
        ];
        for easing in monotonic {
            for i in 1..=100 {
                let t1 = i as f32 / 100.0;
                let t0 = t1 - 0.01;
                assert!(easing.apply(t0) <= easing.apply(t1), "{easing} at {t1}");
            }
        }
    }

    #[test]
    fn test_back_overshoots() {
        assert!(Easing::InBack.apply(0.2) < 0.0);
        assert!(Easing::OutBack.apply(0.8) > 1.0);
    }

    #[test]
    fn test_ease_scalar() {
        assert_eq!(Easing::Linear.ease(&0.0_f32, &10.0, 0.5), 5.0);
        assert_eq!(Easing::InQuad.ease(&2.0_f32, &6.0, 0.5), 3.0);
        assert_eq!(Easing::Linear.ease(&4.0_f32, &-4.0, 2.0), -4.0);
    }

    #[test]
    fn test_names_round_trip() {
        for easing in Easing::all() {
            assert_eq!(easing.name().parse::<Easing>(), Ok(easing));
        }
        assert_eq!(Easing::all().count(), NAMES.len());
        assert_eq!("EaseOutBack".parse::<Easing>(), Ok(Easing::OutBack));
        assert!("easesideways".parse::<Easing>().is_err());
    }

    #[test]
    fn test_step_names() {
        assert_eq!(Easing::Step.name(), "step");
        assert_eq!("step".parse::<Easing>(), Ok(Easing::Step));
        assert_eq!("EaseStep".parse::<Easing>(), Ok(Easing::Step));
        let parsed: Easing = serde_json::from_str("\"step\"").unwrap();
        assert_eq!(parsed, Easing::Step);
    }

    #[test]
    fn test_serde_uses_chart_names() {
        let json = serde_json::to_string(&Easing::InOutElastic).unwrap();
        assert_eq!(json, "\"easeinoutelastic\"");
        let parsed: Easing = serde_json::from_str("\"easeoutbounce\"").unwrap();
        assert_eq!(parsed, Easing::OutBounce);
        assert!(serde_json::from_str::<Easing>("\"wobble\"").is_err());
    }
}
