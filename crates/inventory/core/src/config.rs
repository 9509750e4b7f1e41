use crate::error::{ErrorSeverity, InventoryError};

/// Inventory grid configuration and engine constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Total weight the grid can carry.
    pub max_weight: f32,
}

impl InventoryConfig {
    // ===== engine constants =====
    /// Largest connected subset examined by the rebuild search.
    pub const MAX_SUBSET_SIZE: usize = 6;
    /// Smallest group the engine will form.
    pub const MIN_GROUP_SIZE: usize = 2;

    // ===== accepted ranges =====
    pub const MIN_WIDTH: u32 = 5;
    pub const MAX_WIDTH: u32 = 8;
    pub const MIN_HEIGHT: u32 = 2;
    pub const MAX_HEIGHT: u32 = 5;
    pub const MIN_MAX_WEIGHT: f32 = 8.0;
    pub const MAX_MAX_WEIGHT: f32 = 99.99;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WIDTH: u32 = 8;
    pub const DEFAULT_HEIGHT: u32 = 5;
    pub const DEFAULT_MAX_WEIGHT: f32 = 8.0;

    pub fn new() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            max_weight: Self::DEFAULT_MAX_WEIGHT,
        }
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn max_weight(mut self, max_weight: f32) -> Self {
        self.max_weight = max_weight;
        self
    }

    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_WIDTH..=Self::MAX_WIDTH).contains(&self.width) {
            return Err(ConfigError::Width(self.width));
        }
        if !(Self::MIN_HEIGHT..=Self::MAX_HEIGHT).contains(&self.height) {
            return Err(ConfigError::Height(self.height));
        }
        if !(Self::MIN_MAX_WEIGHT..=Self::MAX_MAX_WEIGHT).contains(&self.max_weight) {
            return Err(ConfigError::MaxWeight(self.max_weight));
        }
        Ok(())
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "grid width {0} outside {min}..={max}",
        min = InventoryConfig::MIN_WIDTH,
        max = InventoryConfig::MAX_WIDTH
    )]
    Width(u32),

    #[error(
        "grid height {0} outside {min}..={max}",
        min = InventoryConfig::MIN_HEIGHT,
        max = InventoryConfig::MAX_HEIGHT
    )]
    Height(u32),

    #[error(
        "max weight {0} outside {min}..={max}",
        min = InventoryConfig::MIN_MAX_WEIGHT,
        max = InventoryConfig::MAX_MAX_WEIGHT
    )]
    MaxWeight(f32),
}

impl InventoryError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Width(_) => "CONFIG_WIDTH",
            Self::Height(_) => "CONFIG_HEIGHT",
            Self::MaxWeight(_) => "CONFIG_MAX_WEIGHT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = InventoryConfig::default();
        assert_eq!((config.width, config.height), (8, 5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(
            InventoryConfig::with_size(9, 5).validate(),
            Err(ConfigError::Width(9))
        );
        assert_eq!(
            InventoryConfig::with_size(5, 1).validate(),
            Err(ConfigError::Height(1))
        );
        assert_eq!(
            InventoryConfig::new().max_weight(100.0).validate(),
            Err(ConfigError::MaxWeight(100.0))
        );
    }
}
