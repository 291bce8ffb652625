use serde::Serialize;

use crate::error::{PipelineError, Result};

pub const MIN_HORIZON_DAYS: u32 = 30;
pub const MAX_HORIZON_DAYS: u32 = 365;
pub const DEFAULT_HORIZON_DAYS: u32 = 90;

/// Forecast horizon in days, bounded to `[30, 365]`.
///
/// One unit is one day. Construction goes through [`HorizonDays::new`] and
/// there is no `Deserialize` impl, so an out-of-range value cannot reach
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HorizonDays(u32);

impl HorizonDays {
    pub fn new(days: i64) -> Result<Self> {
        if days < i64::from(MIN_HORIZON_DAYS) || days > i64::from(MAX_HORIZON_DAYS) {
            return Err(PipelineError::InvalidHorizon {
                requested: days,
                min: MIN_HORIZON_DAYS,
                max: MAX_HORIZON_DAYS,
            });
        }
        Ok(Self(days as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for HorizonDays {
    fn default() -> Self {
        Self(DEFAULT_HORIZON_DAYS)
    }
}

impl std::fmt::Display for HorizonDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_90() {
        assert_eq!(HorizonDays::default().get(), 90);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(HorizonDays::new(30).unwrap().get(), 30);
        assert_eq!(HorizonDays::new(365).unwrap().get(), 365);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            HorizonDays::new(29),
            Err(PipelineError::InvalidHorizon { requested: 29, .. })
        ));
        assert!(matches!(
            HorizonDays::new(366),
            Err(PipelineError::InvalidHorizon { .. })
        ));
        assert!(HorizonDays::new(-5).is_err());
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&HorizonDays::new(120).unwrap()).unwrap();
        assert_eq!(json, "120");
    }
}
