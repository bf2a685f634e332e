//! Enabled-field selection

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::PayloadType;

/// Set of payload types selected for transmission.
///
/// Backed by a table indexed by [`PayloadType::index`], so iteration always follows wire
/// order regardless of the order fields were enabled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSet {
    enabled: [bool; PayloadType::COUNT],
}

impl FieldSet {
    /// No fields enabled.
    pub const fn empty() -> Self {
        Self { enabled: [false; PayloadType::COUNT] }
    }

    /// Every catalog field enabled.
    pub const fn all() -> Self {
        Self { enabled: [true; PayloadType::COUNT] }
    }

    pub fn enable(&mut self, payload: PayloadType) {
        self.enabled[payload.index()] = true;
    }

    pub fn disable(&mut self, payload: PayloadType) {
        self.enabled[payload.index()] = false;
    }

    /// Builder-style [`FieldSet::enable`].
    pub fn with(mut self, payload: PayloadType) -> Self {
        self.enable(payload);
        self
    }

    pub fn is_enabled(&self, payload: PayloadType) -> bool {
        self.enabled[payload.index()]
    }

    /// Enabled payload types in index order.
    pub fn iter(&self) -> impl Iterator<Item = PayloadType> + '_ {
        PayloadType::ALL.into_iter().filter(|payload| self.is_enabled(*payload))
    }

    pub fn len(&self) -> usize {
        self.enabled.iter().filter(|enabled| **enabled).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.enabled.contains(&true)
    }
}

impl FromIterator<PayloadType> for FieldSet {
    fn from_iter<I: IntoIterator<Item = PayloadType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), FieldSet::with)
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Vec::<PayloadType>::deserialize(deserializer)?;
        Ok(fields.into_iter().collect())
    }
}
