use core::fmt;
use core::num::NonZeroU32;

/// Identifier of a feed-water pump (and of its pump controller).
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<PumpId>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PumpId(NonZeroU32);

impl PumpId {
    /// Create a PumpId from a 0-based index by storing index+1.
    pub const fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based index.
    pub const fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// The 0-based index as a vector slot.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for PumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PumpId({})", self.index())
    }
}

impl fmt::Display for PumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

// Serialized as the plain 0-based index, which is what the plant protocol uses.
#[cfg(feature = "serde")]
impl serde::Serialize for PumpId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.index())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PumpId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u32::deserialize(deserializer)?;
        Ok(Self::from_index(index))
    }
}
