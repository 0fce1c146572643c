//! Machine settings: categories of settings with current values.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::definition::{value_to_string, RawDocument, RawSetting};
use super::error::{Result, SettingsError};

/// A configurable value and its sub-settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Setting {
    key: String,
    pub label: String,
    pub type_name: String,
    pub default_value: String,
    pub unit: String,
    pub description: String,
    pub visible: bool,
    value: String,
    category: String,
    children: Vec<Setting>,
}

impl Setting {
    pub fn new(key: impl Into<String>, default_value: impl Into<String>) -> Self {
        let default_value = default_value.into();
        Self {
            key: key.into(),
            label: String::new(),
            type_name: String::new(),
            value: default_value.clone(),
            default_value,
            unit: String::new(),
            description: String::new(),
            visible: true,
            category: String::new(),
            children: Vec::new(),
        }
    }

    fn from_raw(raw: &RawSetting, category: &str) -> Self {
        let default_value = value_to_string(&raw.default);
        Self {
            key: raw.key.clone(),
            label: raw.label.clone(),
            type_name: raw.type_name.clone(),
            value: default_value.clone(),
            default_value,
            unit: raw.unit.clone(),
            description: raw.description.clone(),
            visible: raw.visible,
            category: category.to_string(),
            children: raw.children.iter().map(|c| Self::from_raw(c, category)).collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Key of the owning category
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn children(&self) -> &[Setting] {
        &self.children
    }

    fn set_category(&mut self, category: &str) {
        self.category = category.to_string();
        for child in &mut self.children {
            child.set_category(category);
        }
    }

    fn find(&self, key: &str) -> Option<&Setting> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Setting> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(key))
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Setting>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }
}

/// A named group of top-level settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsCategory {
    key: String,
    pub label: String,
    pub visible: bool,
    settings: Vec<Setting>,
}

impl SettingsCategory {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: String::new(),
            visible: true,
            settings: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn add_setting(&mut self, mut setting: Setting) {
        setting.set_category(&self.key);
        self.settings.push(setting);
    }

    /// Every setting in this category, depth-first.
    pub fn all_settings(&self) -> Vec<&Setting> {
        let mut out = Vec::new();
        for setting in &self.settings {
            setting.collect(&mut out);
        }
        out
    }

    pub fn get_setting_by_key(&self, key: &str) -> Option<&Setting> {
        self.settings.iter().find_map(|s| s.find(key))
    }

    fn get_setting_by_key_mut(&mut self, key: &str) -> Option<&mut Setting> {
        self.settings.iter_mut().find_map(|s| s.find_mut(key))
    }
}

/// All settings of one machine.
#[derive(Clone, Debug, Default)]
pub struct MachineSettings {
    categories: Vec<SettingsCategory>,
    platform_mesh: Option<String>,
}

impl MachineSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load categories, settings and default values from a JSON definition
    /// file. Categories without a key are skipped.
    pub fn load_settings_from_file(&mut self, path: &Path) -> Result<()> {
        let doc = RawDocument::load(path)?;
        if doc.platform.is_some() {
            self.platform_mesh = doc.platform.clone();
        }
        for (key, raw) in doc.keyed_categories() {
            let mut category = SettingsCategory::new(key);
            category.label = raw.label.clone();
            category.visible = raw.visible;
            for setting in &raw.settings {
                category.settings.push(Setting::from_raw(setting, key));
            }
            self.categories.push(category);
        }
        log::info!(
            "Loaded {} settings in {} categories from {:?}",
            self.all_settings().len(),
            self.categories.len(),
            path
        );
        Ok(())
    }

    /// Apply `<key> <value>` lines. Category lines, short lines and
    /// unknown keys are skipped. Returns how many values were applied.
    pub fn load_values_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path)?;
        let mut applied = 0;
        for (number, line) in content.lines().enumerate() {
            if line.contains("CATEGORY") {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
                if !line.trim().is_empty() {
                    log::warn!("{:?}:{}: expected '<key> <value>'", path, number + 1);
                }
                continue;
            };
            match self.get_setting_by_key_mut(key) {
                Some(setting) => {
                    setting.set_value(value);
                    applied += 1;
                }
                None => log::debug!("Ignoring unknown setting '{}'", key),
            }
        }
        Ok(applied)
    }

    /// Write a `CATEGORY: <key>` line per category followed by its visible
    /// settings as `<key> <value>`.
    pub fn save_values_to_file(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(fs::File::create(path)?);
        for category in &self.categories {
            writeln!(out, "CATEGORY: {}", category.key)?;
            for setting in category.all_settings() {
                if setting.visible {
                    writeln!(out, "{} {}", setting.key, setting.value)?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn add_settings_category(&mut self, category: SettingsCategory) {
        self.categories.push(category);
    }

    pub fn get_settings_category(&self, key: &str) -> Option<&SettingsCategory> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn categories(&self) -> &[SettingsCategory] {
        &self.categories
    }

    pub fn all_settings(&self) -> Vec<&Setting> {
        self.categories.iter().flat_map(|c| c.all_settings()).collect()
    }

    pub fn get_setting_by_key(&self, key: &str) -> Option<&Setting> {
        self.categories.iter().find_map(|c| c.get_setting_by_key(key))
    }

    fn get_setting_by_key_mut(&mut self, key: &str) -> Option<&mut Setting> {
        self.categories
            .iter_mut()
            .find_map(|c| c.get_setting_by_key_mut(key))
    }

    /// Add `setting` under a category or under another setting.
    pub fn add_setting(&mut self, parent_key: &str, mut setting: Setting) -> Result<()> {
        if let Some(category) = self.categories.iter_mut().find(|c| c.key == parent_key) {
            category.add_setting(setting);
            return Ok(());
        }
        match self.get_setting_by_key_mut(parent_key) {
            Some(parent) => {
                let category = parent.category.clone();
                setting.set_category(&category);
                parent.children.push(setting);
                Ok(())
            }
            None => Err(SettingsError::UnknownKey(parent_key.to_string())),
        }
    }

    /// Set a value. Unknown keys are ignored.
    pub fn set_setting_value_by_key(&mut self, key: &str, value: impl Into<String>) {
        if let Some(setting) = self.get_setting_by_key_mut(key) {
            setting.set_value(value);
        }
    }

    pub fn get_setting_value_by_key(&self, key: &str) -> Option<&str> {
        match self.get_setting_by_key(key) {
            Some(setting) => Some(setting.value()),
            None => {
                log::error!("Setting key not found: {}", key);
                None
            }
        }
    }

    pub fn platform_mesh(&self) -> Option<&str> {
        self.platform_mesh.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const JSON: &str = r#"{
        "platform": "platform.stl",
        "Categories": [
            {
                "key": "resolution",
                "label": "Quality",
                "Settings": [
                    { "key": "layer_height", "type": "float", "default": 0.1,
                      "children": [ { "key": "layer_height_0", "default": 0.3 } ] },
                    { "key": "shell_hidden", "default": 2, "visible": false }
                ]
            },
            { "label": "No key", "Settings": [ { "key": "orphan" } ] },
            { "key": "speed", "Settings": [ { "key": "print_speed", "type": "int", "default": 50 } ] }
        ]
    }"#;

    fn machine() -> (tempfile::TempDir, MachineSettings) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machine.json");
        fs::write(&path, JSON).unwrap();
        let mut settings = MachineSettings::new();
        settings.load_settings_from_file(&path).unwrap();
        (dir, settings)
    }

    #[test]
    fn test_load_definitions() {
        let (_dir, settings) = machine();
        assert_eq!(settings.categories().len(), 2);
        assert_eq!(settings.platform_mesh(), Some("platform.stl"));
        assert_eq!(settings.all_settings().len(), 4);
        assert!(settings.get_setting_by_key("orphan").is_none());
        let child = settings.get_setting_by_key("layer_height_0").unwrap();
        assert_eq!(child.value(), "0.3");
        assert_eq!(child.category(), "resolution");
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let (_dir, mut settings) = machine();
        let before: Vec<String> = settings.all_settings().iter().map(|s| s.value().to_string()).collect();
        settings.set_setting_value_by_key("nonexistent_key", "5");
        let after: Vec<String> = settings.all_settings().iter().map(|s| s.value().to_string()).collect();
        assert_eq!(before, after);
        assert_eq!(settings.get_setting_value_by_key("nonexistent_key"), None);
    }

    #[test]
    fn test_values_file_skips_short_lines() {
        let (dir, mut settings) = machine();
        let values = dir.path().join("values.txt");
        fs::write(
            &values,
            "CATEGORY: resolution\nlayer_height 0.2\nlayer_height_0\nunknown 3\nprint_speed 80\n",
        )
        .unwrap();

        assert_eq!(settings.load_values_from_file(&values).unwrap(), 2);
        assert_eq!(settings.get_setting_value_by_key("layer_height"), Some("0.2"));
        assert_eq!(settings.get_setting_value_by_key("layer_height_0"), Some("0.3"));
        assert_eq!(settings.get_setting_value_by_key("print_speed"), Some("80"));
    }

    #[test]
    fn test_save_writes_visible_settings() {
        let (dir, mut settings) = machine();
        settings.set_setting_value_by_key("print_speed", "60");
        let values = dir.path().join("values.txt");
        settings.save_values_to_file(&values).unwrap();

        let written = fs::read_to_string(&values).unwrap();
        assert_eq!(
            written,
            "CATEGORY: resolution\nlayer_height 0.1\nlayer_height_0 0.3\nCATEGORY: speed\nprint_speed 60\n"
        );
    }

    #[test]
    fn test_add_setting_under_setting() {
        let (_dir, mut settings) = machine();
        settings
            .add_setting("print_speed", Setting::new("travel_speed", "120"))
            .unwrap();
        let added = settings.get_setting_by_key("travel_speed").unwrap();
        assert_eq!(added.category(), "speed");

        assert!(matches!(
            settings.add_setting("missing", Setting::new("x", "1")),
            Err(SettingsError::UnknownKey(_))
        ));
    }
}
