//! Consumption limit value object.
//!
//! On the wire and in storage a limit is an integer where `-1` means
//! "unlimited". In the domain that sentinel never survives as a number: it is
//! decoded into [`Limit::Unlimited`] at the boundary so no code path can ever
//! compare a count against `-1`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Raw integer used to encode an unlimited quota.
pub const UNLIMITED_SENTINEL: i64 = -1;

/// A numeric entitlement bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// No bound applies.
    Unlimited,
    /// At most `n` units are allowed.
    AtMost(u32),
}

impl Limit {
    /// Decodes the integer wire form.
    ///
    /// Returns `None` for negative values other than the `-1` sentinel and
    /// for values that do not fit in `u32`.
    pub fn from_raw(raw: i64) -> Option<Self> {
        if raw == UNLIMITED_SENTINEL {
            return Some(Limit::Unlimited);
        }
        u32::try_from(raw).ok().map(Limit::AtMost)
    }

    /// Encodes into the integer wire form.
    pub fn as_raw(&self) -> i64 {
        match self {
            Limit::Unlimited => UNLIMITED_SENTINEL,
            Limit::AtMost(max) => i64::from(*max),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Limit::Unlimited)
    }

    /// Returns the bound, or `None` when unlimited.
    pub fn max(&self) -> Option<u32> {
        match self {
            Limit::Unlimited => None,
            Limit::AtMost(max) => Some(*max),
        }
    }

    /// Returns true when `used` has reached the bound (`used >= max`).
    ///
    /// Always false for [`Limit::Unlimited`].
    pub fn is_reached(&self, used: u64) -> bool {
        match self {
            Limit::Unlimited => false,
            Limit::AtMost(max) => used >= u64::from(*max),
        }
    }

    /// Units still available, or `None` when unlimited.
    pub fn remaining(&self, used: u64) -> Option<u64> {
        self.max().map(|max| u64::from(max).saturating_sub(used))
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Unlimited => write!(f, "unlimited"),
            Limit::AtMost(max) => write!(f, "{}", max),
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_raw())
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Limit::from_raw(raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid limit {}: expected -1 (unlimited) or a non-negative count",
                raw
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sentinel_decodes_to_unlimited() {
        assert_eq!(Limit::from_raw(-1), Some(Limit::Unlimited));
    }

    #[test]
    fn other_negatives_are_rejected() {
        assert_eq!(Limit::from_raw(-2), None);
        assert_eq!(Limit::from_raw(i64::MIN), None);
    }

    #[test]
    fn limit_reached_at_boundary() {
        assert!(Limit::AtMost(3).is_reached(3));
        assert!(Limit::AtMost(3).is_reached(4));
        assert!(!Limit::AtMost(3).is_reached(2));
    }

    #[test]
    fn zero_limit_is_reached_immediately() {
        assert!(Limit::AtMost(0).is_reached(0));
    }

    #[test]
    fn remaining_saturates_at_zero() {
        assert_eq!(Limit::AtMost(3).remaining(5), Some(0));
        assert_eq!(Limit::AtMost(3).remaining(1), Some(2));
        assert_eq!(Limit::Unlimited.remaining(100), None);
    }

    #[test]
    fn serializes_to_integer_wire_form() {
        assert_eq!(serde_json::to_string(&Limit::Unlimited).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Limit::AtMost(10)).unwrap(), "10");
    }

    #[test]
    fn deserialize_rejects_invalid_negative() {
        assert_eq!(serde_json::from_str::<Limit>("-1").unwrap(), Limit::Unlimited);
        assert!(serde_json::from_str::<Limit>("-5").is_err());
    }

    proptest! {
        #[test]
        fn unlimited_is_never_reached(used in any::<u64>()) {
            prop_assert!(!Limit::Unlimited.is_reached(used));
        }

        #[test]
        fn bounded_limit_matches_comparison(max in any::<u32>(), used in any::<u64>()) {
            prop_assert_eq!(Limit::AtMost(max).is_reached(used), used >= u64::from(max));
        }

        #[test]
        fn raw_form_is_sentinel_or_natural(raw in -1i64..=i64::from(u32::MAX)) {
            let limit = Limit::from_raw(raw).unwrap();
            prop_assert_eq!(limit.as_raw(), raw);
            prop_assert!(limit.as_raw() >= UNLIMITED_SENTINEL);
        }
    }
}
