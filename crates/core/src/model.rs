use std::fmt;
use std::num::{NonZeroU16, NonZeroU32};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseConfigError;

/// Identifier of a physical desk. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeskId(NonZeroU32);

impl DeskId {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for DeskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for DeskId {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| ParseConfigError::InvalidDesk(s.to_string()))?;
        Self::new(value).ok_or_else(|| ParseConfigError::InvalidDesk(s.to_string()))
    }
}

/// TCP port handed to the monitor for its debug interface. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(NonZeroU16);

impl Port {
    pub fn new(value: u16) -> Option<Self> {
        NonZeroU16::new(value).map(Self)
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Port {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s
            .trim()
            .parse()
            .map_err(|_| ParseConfigError::InvalidPort(s.to_string()))?;
        Self::new(value).ok_or_else(|| ParseConfigError::InvalidPort(s.to_string()))
    }
}

/// Everything one launcher instance needs to know about the desk it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    pub desk: DeskId,
    pub port: Port,
    pub label: Option<String>,
}

impl DeskConfig {
    pub fn new(desk: DeskId, port: Port) -> Self {
        Self {
            desk,
            port,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Human-readable name used in banners, e.g. `desk 8` or `desk 8 (VIP room)`.
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) if !label.trim().is_empty() => format!("desk {} ({})", self.desk, label),
            _ => format!("desk {}", self.desk),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("8", Some(8))]
    #[case(" 12 ", Some(12))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("desk", None)]
    fn parses_desk_ids(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(input.parse::<DeskId>().ok().map(DeskId::get), expected);
    }

    #[rstest]
    #[case("9230", Some(9230))]
    #[case("65535", Some(65535))]
    #[case("65536", None)]
    #[case("0", None)]
    fn parses_ports(#[case] input: &str, #[case] expected: Option<u16>) {
        assert_eq!(input.parse::<Port>().ok().map(Port::get), expected);
    }

    #[test]
    fn display_name_includes_non_ascii_label() {
        let config = DeskConfig::new(DeskId::new(8).unwrap(), Port::new(9230).unwrap())
            .with_label("龙虎 8号桌");
        assert_eq!(config.display_name(), "desk 8 (龙虎 8号桌)");
    }

    #[test]
    fn display_name_ignores_blank_label() {
        let config =
            DeskConfig::new(DeskId::new(12).unwrap(), Port::new(9234).unwrap()).with_label("  ");
        assert_eq!(config.display_name(), "desk 12");
    }
}
