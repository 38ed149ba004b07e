//! User configuration loaded from TOML.
//!
//! ```toml
//! visible_slot_cap = 3        # or "unlimited"
//! events = "~/holidays.toml"
//! columns = 3
//! color = true
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{DEFAULT_VISIBLE_SLOT_CAP, LayoutConfig};

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/holical/config.toml";

/// Number of bar rows shown per week before the `+N` overflow marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotCap {
    Limited(usize),
    Unlimited,
}

impl SlotCap {
    pub fn to_layout_config(self) -> Result<LayoutConfig> {
        match self {
            SlotCap::Limited(n) => LayoutConfig::new(n),
            SlotCap::Unlimited => Ok(LayoutConfig::unbounded()),
        }
    }
}

impl Default for SlotCap {
    fn default() -> Self {
        SlotCap::Limited(DEFAULT_VISIBLE_SLOT_CAP)
    }
}

impl FromStr for SlotCap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unlimited") {
            return Ok(SlotCap::Unlimited);
        }
        let n: usize = s
            .parse()
            .map_err(|_| Error::Config(format!("Invalid slot cap: {s}")))?;
        if n == 0 {
            return Err(Error::InvalidSlotCap(n));
        }
        Ok(SlotCap::Limited(n))
    }
}

impl fmt::Display for SlotCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotCap::Limited(n) => write!(f, "{n}"),
            SlotCap::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl<'de> Deserialize<'de> for SlotCap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(usize),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string().parse::<SlotCap>(),
            Raw::Text(s) => s.parse::<SlotCap>(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub visible_slot_cap: SlotCap,
    /// Events file used when `--events` is not given. A relative path is
    /// taken from the directory holding the config file.
    pub events: Option<String>,
    /// Months per row in year view; terminal width decides when unset.
    pub columns: Option<u32>,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            visible_slot_cap: SlotCap::default(),
            events: None,
            columns: None,
            color: true,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.columns == Some(0) {
            return Err(Error::Config("columns must be positive".to_string()));
        }
        Ok(config)
    }

    /// Load `path` if given (it must exist), else the default location if present, else defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let (raw, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };
        let expanded = shellexpand::tilde(raw);
        let file = Path::new(expanded.as_ref());

        if !required && !file.exists() {
            debug!(path = %expanded, "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(file)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", file.display())))?;
        let mut config = Config::parse(&content)?;
        if let (Some(events), Some(dir)) = (config.events.as_mut(), file.parent()) {
            let events_path = shellexpand::tilde(events.as_str()).into_owned();
            if Path::new(&events_path).is_relative() {
                *events = dir.join(events_path).display().to_string();
            }
        }
        info!(path = %expanded, cap = %config.visible_slot_cap, "loaded config");
        Ok(config)
    }
}
