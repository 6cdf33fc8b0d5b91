//! Theme store — light/dark preference.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the OS setting.
    #[default]
    System,
}

impl ThemeMode {
    /// Light ↔ dark. `System` resolves to dark.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark | Self::System => Self::Light,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

#[derive(Debug, Default)]
pub struct ThemeStore {
    mode: RwLock<ThemeMode>,
}

impl ThemeStore {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode: RwLock::new(mode),
        }
    }

    pub async fn mode(&self) -> ThemeMode {
        *self.mode.read().await
    }

    pub async fn set(&self, mode: ThemeMode) {
        *self.mode.write().await = mode;
    }

    /// Flip the theme and return the new mode.
    pub async fn toggle(&self) -> ThemeMode {
        let mut mode = self.mode.write().await;
        *mode = mode.toggled();
        *mode
    }
}
