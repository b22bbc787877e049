//! Internal vapor and liquid flows.

use crate::config::ColumnConfig;
use crate::error::{ColumnError, ColumnResult};
use dc_core::clamped_pow;

/// Weir-law exponent for liquid leaving a tray.
pub const WEIR_EXPONENT: f64 = 1.5;

/// Vapor and liquid leaving every stage, indexed like the state vector.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowProfile {
    pub vapor: Vec<f64>,
    pub liquid: Vec<f64>,
}

impl FlowProfile {
    /// Flows for the given stage holdups.
    ///
    /// Vapor is constant within each section: stripping vapor below the feed
    /// tray, rectifying vapor from the feed tray up, none from the condenser.
    /// Tray liquid follows the weir law on the holdup above `tray_holdup`.
    pub fn from_holdups(config: &ColumnConfig, holdups: &[f64]) -> ColumnResult<Self> {
        let n = config.num_stages();
        if holdups.len() != n {
            return Err(ColumnError::configuration(format!(
                "{} holdups given, column has {n} stages",
                holdups.len()
            )));
        }
        let top = config.condenser();
        let v_str = config.stripping_vapor();
        let v_rec = config.rectifying_vapor();

        let vapor = (0..n)
            .map(|i| match i {
                i if i < config.feed_stage => v_str,
                i if i < top => v_rec,
                _ => 0.0,
            })
            .collect();

        let liquid = (0..n)
            .map(|i| {
                if i == 0 {
                    config.feed_flow - config.distillate_flow
                        + config.level_gain * (holdups[0] - config.reboiler_holdup)
                } else if i == top {
                    config.reflux_flow()
                } else {
                    config.weir_constant
                        * clamped_pow(holdups[i] - config.tray_holdup, WEIR_EXPONENT)
                }
            })
            .collect();

        Ok(Self { vapor, liquid })
    }

    /// Bottoms product (liquid leaving the reboiler).
    pub fn bottoms(&self) -> f64 {
        self.liquid[0]
    }

    /// Reflux returned from the condenser.
    pub fn reflux(&self) -> f64 {
        self.liquid[self.liquid.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ColumnConfig {
        ColumnConfig::ideal(4, 2, 10.0, 0.5, 4.0, 2.0)
            .unwrap()
            .with_reflux_ratio(2.0)
            .with_feed_quality(0.5)
    }

    #[test]
    fn vapor_by_section() {
        let cfg = config();
        let flows = FlowProfile::from_holdups(&cfg, &[0.5, 1.0, 1.0, 1.0, 1.0, 0.5]).unwrap();
        // V_rec = 8 + 4, V_str = 12 - 10 * 0.5
        assert_eq!(flows.vapor, vec![7.0, 7.0, 12.0, 12.0, 12.0, 0.0]);
        assert_eq!(flows.reflux(), 8.0);
        assert_eq!(flows.bottoms(), 6.0);
    }

    #[test]
    fn weir_below_threshold_is_zero() {
        let cfg = config();
        let flows = FlowProfile::from_holdups(&cfg, &[0.5, 0.05, 0.1, 1.1, 0.1 + 4.0, 0.5]).unwrap();
        assert_eq!(flows.liquid[1], 0.0);
        assert_eq!(flows.liquid[2], 0.0);
        assert!((flows.liquid[3] - 1.0).abs() < 1e-12);
        assert!((flows.liquid[4] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn level_control_adjusts_bottoms() {
        let cfg = config().with_level_gain(2.0);
        let flows = FlowProfile::from_holdups(&cfg, &[1.0, 1.0, 1.0, 1.0, 1.0, 0.5]).unwrap();
        assert_eq!(flows.bottoms(), 6.0 + 2.0 * 0.5);
    }

    #[test]
    fn holdup_count_must_match_stages() {
        let cfg = config();
        assert!(matches!(
            FlowProfile::from_holdups(&cfg, &[1.0, 1.0, 1.0]),
            Err(ColumnError::Configuration { .. })
        ));
    }
}
