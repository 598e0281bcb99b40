use std::fmt;

/// Stable identifier of a participant, referencing the external actor it
/// stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an item definition in the item catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// Identifier of an encounter. Assigned by whoever hosts encounters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterId(pub u64);

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encounter:{}", self.0)
    }
}

/// Sequential turn identifier, unique within one encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnId(pub u64);

impl TurnId {
    pub const FIRST: Self = Self(1);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn:{}", self.0)
    }
}

/// Side (team) a participant fights for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideId(pub u32);

/// Current and maximum hit points.
///
/// The methods keep `0 <= current <= max`; construct through [`HitPoints::new`]
/// or [`HitPoints::full`] rather than struct literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPoints {
    pub current: u32,
    pub max: u32,
}

impl HitPoints {
    /// Creates a meter, clamping `current` to `max`.
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Subtracts damage, flooring at zero. Returns the amount actually removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds healing, capping at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max - self.current);
        self.current += restored;
        restored
    }

    /// Returns a meter with a new maximum, current clamped to it.
    pub fn with_max(self, max: u32) -> Self {
        Self::new(self.current, max)
    }
}

impl fmt::Display for HitPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_floors_at_zero() {
        let mut hp = HitPoints::full(15);
        assert_eq!(hp.damage(9), 9);
        assert_eq!(hp.damage(9), 6);
        assert_eq!(hp.current, 0);
        assert!(hp.is_depleted());
    }

    #[test]
    fn heal_caps_at_max() {
        let mut hp = HitPoints::new(3, 10);
        assert_eq!(hp.heal(20), 7);
        assert_eq!(hp, HitPoints::full(10));
    }

    #[test]
    fn new_clamps_current() {
        assert_eq!(HitPoints::new(50, 20).current, 20);
        assert_eq!(HitPoints::new(12, 20).with_max(8).current, 8);
    }
}
