use std::fmt;

/// Exclusive upper bound of the category id space.
pub const MAX_CATEGORY_ID: u16 = 65001;

/// Stable numeric identity of a registered category.
///
/// Ids are always below [`MAX_CATEGORY_ID`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CategoryId(u16);

impl CategoryId {
    /// Creates an id, returning `None` when `raw` is outside the id space.
    #[must_use]
    pub const fn new(raw: u16) -> Option<Self> {
        if raw < MAX_CATEGORY_ID {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Iterates the whole id space in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..MAX_CATEGORY_ID).map(Self)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<CategoryId> for u16 {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

impl TryFrom<i64> for CategoryId {
    type Error = i64;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        u16::try_from(raw)
            .ok()
            .and_then(Self::new)
            .ok_or(raw)
    }
}
