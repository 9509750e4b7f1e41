use std::iter::Sum;
use std::ops::Add;

/// Stat payload granted while a bonus is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BonusStats {
    pub attack: i32,
    pub defense: i32,
    pub health: i32,
}

impl BonusStats {
    pub const ZERO: Self = Self {
        attack: 0,
        defense: 0,
        health: 0,
    };

    pub const fn new(attack: i32, defense: i32, health: i32) -> Self {
        Self {
            attack,
            defense,
            health,
        }
    }
}

impl Add for BonusStats {
    type Output = BonusStats;

    fn add(self, rhs: Self) -> Self {
        Self {
            attack: self.attack + rhs.attack,
            defense: self.defense + rhs.defense,
            health: self.health + rhs.health,
        }
    }
}

impl Sum for BonusStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Immutable recipe: an exact multiset of item identifiers and its reward.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: BonusStats,
    /// Required item ids. Order is irrelevant, duplicates are meaningful.
    pub requirements: Vec<String>,
    /// Lower wins when several bonuses match the same multiset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
}

impl BonusDefinition {
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            stats: BonusStats::ZERO,
            requirements: requirements.into_iter().map(Into::into).collect(),
            priority: 0,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: BonusStats) -> Self {
        self.stats = stats;
        self
    }

    /// Total number of items the recipe asks for.
    pub fn requirement_count(&self) -> usize {
        self.requirements.len()
    }
}
