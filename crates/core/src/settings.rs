use std::sync::Arc;

use crate::domain::{Settings, SettingsPatch, Theme};
use crate::store::{keys, load_or_warn, persist, KeyValueStore};

/// Where the resolved dark-mode flag goes when the theme changes.
pub trait ThemeSink: Send {
    /// Platform preference consulted for [`Theme::System`].
    fn prefers_dark(&self) -> bool {
        false
    }

    fn set_dark_mode(&mut self, dark: bool);
}

/// Sink for callers with nothing to restyle.
#[derive(Debug, Default)]
pub struct NoThemeSink;

impl ThemeSink for NoThemeSink {
    fn set_dark_mode(&mut self, _dark: bool) {}
}

pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    settings: Settings,
    sink: Box<dyn ThemeSink>,
    dark_mode: bool,
}

impl SettingsStore {
    /// Load stored preferences over the defaults and apply the theme once.
    pub fn load(store: Arc<dyn KeyValueStore>, sink: Box<dyn ThemeSink>) -> Self {
        let settings: Settings = load_or_warn(store.as_ref(), keys::SETTINGS).unwrap_or_default();
        let mut this = Self {
            store,
            settings,
            sink,
            dark_mode: false,
        };
        this.apply_theme(settings.theme);
        this
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Whether the current theme resolves to dark.
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Merge the set fields, save, and restyle immediately if the theme
    /// was part of the patch.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Settings {
        if let Some(theme) = patch.theme {
            self.settings.theme = theme;
        }
        if let Some(density) = patch.grid_density {
            self.settings.grid_density = density;
        }
        if let Some(expert) = patch.expert_mode {
            self.settings.expert_mode = expert;
        }
        persist(self.store.as_ref(), keys::SETTINGS, &self.settings);

        if let Some(theme) = patch.theme {
            self.apply_theme(theme);
        }
        self.settings
    }

    fn apply_theme(&mut self, theme: Theme) {
        let dark = match theme {
            Theme::Dark => true,
            Theme::Light => false,
            Theme::System => self.sink.prefers_dark(),
        };
        self.dark_mode = dark;
        self.sink.set_dark_mode(dark);
        tracing::debug!(theme = theme.as_str(), dark, "applied theme");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::GridDensity;
    use crate::store::{load, MemoryStore};

    /// Records every dark-mode change.
    struct Recorder {
        prefers_dark: bool,
        calls: Arc<Mutex<Vec<bool>>>,
    }

    impl ThemeSink for Recorder {
        fn prefers_dark(&self) -> bool {
            self.prefers_dark
        }

        fn set_dark_mode(&mut self, dark: bool) {
            self.calls.lock().unwrap().push(dark);
        }
    }

    fn make_store(prefers_dark: bool) -> (SettingsStore, Arc<MemoryStore>, Arc<Mutex<Vec<bool>>>) {
        let store = Arc::new(MemoryStore::new());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Recorder {
            prefers_dark,
            calls: calls.clone(),
        };
        (SettingsStore::load(store.clone(), Box::new(sink)), store, calls)
    }

    #[test]
    fn test_defaults_applied_on_load() {
        let (settings, _store, calls) = make_store(true);
        assert_eq!(settings.settings(), Settings::default());
        // System theme follows the platform preference.
        assert!(settings.dark_mode());
        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_update_merges_fields() {
        let (mut settings, store, _calls) = make_store(false);
        settings.update_settings(SettingsPatch {
            expert_mode: Some(true),
            ..Default::default()
        });
        let updated = settings.update_settings(SettingsPatch {
            grid_density: Some(GridDensity::Compact),
            ..Default::default()
        });
        assert!(updated.expert_mode);
        assert_eq!(updated.grid_density, GridDensity::Compact);
        assert_eq!(updated.theme, Theme::System);

        let stored: Settings = load(store.as_ref(), keys::SETTINGS).unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn test_theme_change_applies_immediately() {
        let (mut settings, _store, calls) = make_store(false);
        settings.update_settings(SettingsPatch {
            theme: Some(Theme::Dark),
            ..Default::default()
        });
        assert!(settings.dark_mode());
        settings.update_settings(SettingsPatch {
            expert_mode: Some(true),
            ..Default::default()
        });
        settings.update_settings(SettingsPatch {
            theme: Some(Theme::Light),
            ..Default::default()
        });
        assert!(!settings.dark_mode());
        // Load, dark, light; the expert-mode update did not restyle.
        assert_eq!(*calls.lock().unwrap(), vec![false, true, false]);
    }

    #[test]
    fn test_partial_stored_settings_merge_over_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SETTINGS, r#"{"expertMode":true}"#).unwrap();
        let settings = SettingsStore::load(store.clone(), Box::new(NoThemeSink));
        assert!(settings.settings().expert_mode);
        assert_eq!(settings.settings().theme, Theme::System);
    }

    #[test]
    fn test_unknown_theme_keeps_other_stored_settings() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(keys::SETTINGS, r#"{"theme":"blue","expertMode":true}"#)
            .unwrap();
        let settings = SettingsStore::load(store.clone(), Box::new(NoThemeSink));
        assert!(settings.settings().expert_mode);
        assert_eq!(settings.settings().theme, Theme::System);
    }
}
