//! Persisted UI theme selection over a closed set of themes.
use crate::storage::{KeyValueBackend, PersistenceStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Visual themes offered by the theme switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Brutalist,
    Y2k,
    Neon,
}

impl Theme {
    pub const ALL: [Self; 3] = [Self::Brutalist, Self::Y2k, Self::Neon];

    /// Value used for `data-theme` attributes and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brutalist => "brutalist",
            Self::Y2k => "y2k",
            Self::Neon => "neon",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Brutalist => "Brutalist",
            Self::Y2k => "Y2K",
            Self::Neon => "Neon",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown theme `{0}`")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Rendering side of the theme switch: the page-level marker and the active button.
pub trait ThemeSurface {
    fn apply_theme(&mut self, theme: Theme);
}

/// Currently selected theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemePreference {
    current: Theme,
}

impl ThemePreference {
    /// Read the stored theme (default when absent or invalid) and reflect it on `surface`.
    pub fn load<B: KeyValueBackend>(
        store: &PersistenceStore<B>,
        surface: &mut impl ThemeSurface,
    ) -> Self {
        let current = store.theme().unwrap_or_default();
        surface.apply_theme(current);
        Self { current }
    }

    #[must_use]
    pub const fn get(&self) -> Theme {
        self.current
    }

    /// Switch to `theme`, persist it, then update the surface.
    pub fn set<B: KeyValueBackend>(
        &mut self,
        theme: Theme,
        store: &mut PersistenceStore<B>,
        surface: &mut impl ThemeSurface,
    ) {
        self.current = theme;
        store.store_theme(theme);
        surface.apply_theme(theme);
        log::debug!("theme switched to {theme}");
    }

    /// Switch by name as it arrives from the page. Unknown names are a no-op and return `None`.
    pub fn select<B: KeyValueBackend>(
        &mut self,
        name: &str,
        store: &mut PersistenceStore<B>,
        surface: &mut impl ThemeSurface,
    ) -> Option<Theme> {
        match name.parse::<Theme>() {
            Ok(theme) => {
                self.set(theme, store, surface);
                Some(theme)
            }
            Err(err) => {
                log::debug!("theme switch rejected: {err}");
                None
            }
        }
    }
}
