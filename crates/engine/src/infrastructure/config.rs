//! Engine configuration
//!
//! Values come from `FIELDHOST_*` environment variables (after `.env` is
//! loaded by the binary). Missing variables fall back to defaults; present but
//! malformed ones are rejected.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use fieldhost_domain::InventoryTab;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Inventory tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Items per `Load` notification.
    pub batch_size: usize,
    /// Slots gained per expansion.
    pub expand_slots: i16,
    /// Meret charged per expansion.
    pub expand_price: i64,
    /// Per-tab overrides of the base capacity.
    #[serde(default)]
    pub capacity_overrides: HashMap<InventoryTab, i16>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            expand_slots: 6,
            expand_price: 390,
            capacity_overrides: HashMap::new(),
        }
    }
}

impl InventoryConfig {
    /// Slots a tab has before any purchased expansion.
    pub fn base_capacity(&self, tab: InventoryTab) -> i16 {
        self.capacity_overrides
            .get(&tab)
            .copied()
            .unwrap_or_else(|| tab.base_capacity())
    }
}

/// Field runtime tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub tick_interval_ms: u64,
    /// Capacity of each field's broadcast channel.
    pub event_channel_capacity: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            event_channel_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub inventory: InventoryConfig,
    pub field: FieldConfig,
    /// Seed for trigger randomness; unset means system randomness.
    pub random_seed: Option<u64>,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut capacity_overrides = HashMap::new();
        for tab in InventoryTab::ALL {
            let key = format!("FIELDHOST_CAPACITY_{}", tab.as_str().to_ascii_uppercase());
            if let Some(capacity) = parse_optional::<i16>(&lookup, &key)? {
                capacity_overrides.insert(tab, capacity);
            }
        }

        Ok(Self {
            inventory: InventoryConfig {
                batch_size: parse_or(
                    &lookup,
                    "FIELDHOST_INVENTORY_BATCH_SIZE",
                    defaults.inventory.batch_size,
                )?,
                expand_slots: parse_or(
                    &lookup,
                    "FIELDHOST_INVENTORY_EXPAND_SLOTS",
                    defaults.inventory.expand_slots,
                )?,
                expand_price: parse_or(
                    &lookup,
                    "FIELDHOST_INVENTORY_EXPAND_PRICE",
                    defaults.inventory.expand_price,
                )?,
                capacity_overrides,
            },
            field: FieldConfig {
                tick_interval_ms: parse_or(
                    &lookup,
                    "FIELDHOST_TICK_INTERVAL_MS",
                    defaults.field.tick_interval_ms,
                )?,
                event_channel_capacity: parse_or(
                    &lookup,
                    "FIELDHOST_EVENT_CHANNEL_CAPACITY",
                    defaults.field.event_channel_capacity,
                )?,
            },
            random_seed: parse_optional(&lookup, "FIELDHOST_RANDOM_SEED")?,
        })
    }
}

fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}
