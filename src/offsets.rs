//! Baseline offsets for the HOMO and LUMO bar series
//!
//! The HOMO bars hang from `ip_maxval` and the LUMO bars stand on `-ea_maxval`.
//! Choosing both offsets large enough keeps the two series from overlapping
//! when EA values can be negative.

use crate::config::OffsetStrategy;
use tracing::debug;

/// Magnitudes above this use whole-number ceilings
pub const LARGE_MAGNITUDE: f64 = 0.5;

/// Margin added before the two-decimal ceiling in the small-magnitude case
pub const SMALL_MARGIN: f64 = 0.1;

/// Which normalization branch applies to the whole table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaRegime {
    /// At least one EA value is negative
    Mixed,
    /// Every EA value is zero or positive
    NonNegative,
}

impl EaRegime {
    /// Classify a table by its EA column (nulls are ignored)
    pub fn classify(ea: &[Option<f64>]) -> Self {
        if ea.iter().flatten().any(|v| *v < 0.0) {
            EaRegime::Mixed
        } else {
            EaRegime::NonNegative
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offsets {
    pub ip_maxval: f64,
    pub ea_maxval: f64,
}

impl Offsets {
    /// Compute offsets for one table
    pub fn compute(ip: &[Option<f64>], ea: &[Option<f64>], strategy: OffsetStrategy) -> Self {
        let offsets = match strategy {
            OffsetStrategy::Fixed(c) => Self::fixed(c),
            OffsetStrategy::Adaptive => Self::adaptive(ip, ea),
        };
        debug!(
            ?strategy,
            ip_maxval = offsets.ip_maxval,
            ea_maxval = offsets.ea_maxval,
            "offsets computed"
        );
        offsets
    }

    pub fn fixed(offset: f64) -> Self {
        Self {
            ip_maxval: offset,
            ea_maxval: offset,
        }
    }

    /// Data-dependent offsets
    ///
    /// With any negative EA both series are offset. Large magnitudes (> 0.5) share
    /// one whole-number ceiling of the larger maximum; small ones get their own
    /// two-decimal ceiling with a 0.1 margin. With no negative EA only the IP
    /// series is offset and `ea_maxval` is 0.
    pub fn adaptive(ip: &[Option<f64>], ea: &[Option<f64>]) -> Self {
        let ipmax = max_abs(ip);
        let regime = EaRegime::classify(ea);
        debug!(?regime, ipmax, "classified EA regime");

        match regime {
            EaRegime::Mixed => {
                let eamax = max_abs(ea);
                if ipmax > LARGE_MAGNITUDE || eamax > LARGE_MAGNITUDE {
                    let shared = ipmax.max(eamax).ceil();
                    Self {
                        ip_maxval: shared,
                        ea_maxval: shared,
                    }
                } else {
                    Self {
                        ip_maxval: small_ceiling(ipmax),
                        ea_maxval: small_ceiling(eamax),
                    }
                }
            }
            EaRegime::NonNegative => {
                let ip_maxval = if ipmax > LARGE_MAGNITUDE {
                    ipmax.ceil()
                } else {
                    small_ceiling(ipmax)
                };
                Self {
                    ip_maxval,
                    ea_maxval: 0.0,
                }
            }
        }
    }

    /// Bar height of a HOMO bar (its far edge sits at `ip`)
    pub fn new_ip(&self, ip: f64) -> f64 {
        -self.ip_maxval + ip
    }

    /// Bar height of a LUMO bar (its far edge sits at `ea`)
    pub fn new_ea(&self, ea: f64) -> f64 {
        self.ea_maxval + ea
    }
}

/// Largest absolute value, 0 for an all-null column
fn max_abs(values: &[Option<f64>]) -> f64 {
    values
        .iter()
        .flatten()
        .map(|v| v.abs())
        .fold(0.0, f64::max)
}

/// ceil((max + 0.1) * 100) / 100
///
/// The scaled value is snapped to 1e-9 first: (0.3 + 0.1) * 100 evaluates to
/// 40.000000000000007 and must give 0.40, not 0.41.
fn small_ceiling(max: f64) -> f64 {
    let scaled = (max + SMALL_MARGIN) * 100.0;
    (scaled - 1e-9).ceil() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_mixed_large_regime_uses_shared_ceiling() {
        let offsets = Offsets::adaptive(&some(&[6.2, 5.8]), &some(&[2.1, -0.3]));
        assert_eq!(offsets, Offsets { ip_maxval: 7.0, ea_maxval: 7.0 });
        assert!((offsets.new_ip(6.2) - -0.8).abs() < EPS);
        assert!((offsets.new_ip(5.8) - -1.2).abs() < EPS);
        assert!((offsets.new_ea(2.1) - 9.1).abs() < EPS);
        assert!((offsets.new_ea(-0.3) - 6.7).abs() < EPS);
    }

    #[test]
    fn test_mixed_large_regime_ea_dominates() {
        let offsets = Offsets::adaptive(&some(&[0.2]), &some(&[-3.4]));
        assert_eq!(offsets, Offsets { ip_maxval: 4.0, ea_maxval: 4.0 });
    }

    #[test]
    fn test_mixed_large_regime_tie() {
        let offsets = Offsets::adaptive(&some(&[2.5]), &some(&[-2.5]));
        assert_eq!(offsets, Offsets { ip_maxval: 3.0, ea_maxval: 3.0 });
    }

    #[test]
    fn test_mixed_small_regime_two_decimal_ceilings() {
        let offsets = Offsets::adaptive(&some(&[0.3, -0.12]), &some(&[-0.25, 0.05]));
        assert!((offsets.ip_maxval - 0.40).abs() < EPS);
        assert!((offsets.ea_maxval - 0.35).abs() < EPS);
    }

    #[test]
    fn test_non_negative_regime_small() {
        let offsets = Offsets::adaptive(&some(&[0.3]), &some(&[0.2]));
        assert_eq!(offsets.ea_maxval, 0.0);
        assert!((offsets.ip_maxval - 0.40).abs() < EPS);
        assert!((offsets.new_ip(0.3) - -0.10).abs() < EPS);
        assert_eq!(offsets.new_ea(0.2), 0.2);
    }

    #[test]
    fn test_non_negative_regime_large_ignores_ea_magnitude() {
        let offsets = Offsets::adaptive(&some(&[5.1, 6.9]), &some(&[0.0, 12.0]));
        assert_eq!(offsets, Offsets { ip_maxval: 7.0, ea_maxval: 0.0 });
    }

    #[test]
    fn test_small_ceiling_rounds_up() {
        assert!((small_ceiling(0.333) - 0.44).abs() < EPS);
        assert!((small_ceiling(0.5) - 0.60).abs() < EPS);
        assert!((small_ceiling(0.0) - 0.10).abs() < EPS);
    }

    #[test]
    fn test_nulls_are_ignored() {
        let ea = vec![None, Some(0.4)];
        assert_eq!(EaRegime::classify(&ea), EaRegime::NonNegative);
        let ea = vec![None, Some(-0.4)];
        assert_eq!(EaRegime::classify(&ea), EaRegime::Mixed);
        assert_eq!(max_abs(&[None, Some(-2.0), Some(1.0)]), 2.0);
        assert_eq!(max_abs(&[None]), 0.0);
    }

    #[test]
    fn test_fixed_strategy() {
        let offsets = Offsets::compute(&some(&[6.2]), &some(&[-0.3]), OffsetStrategy::Fixed(5.0));
        assert_eq!(offsets, Offsets { ip_maxval: 5.0, ea_maxval: 5.0 });
        assert!((offsets.new_ip(6.2) - 1.2).abs() < EPS);
        assert!((offsets.new_ea(-0.3) - 4.7).abs() < EPS);
    }
}
