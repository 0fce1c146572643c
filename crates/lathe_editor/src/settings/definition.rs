//! Setting definition trees loaded from JSON.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::Result;

/// Type name given to category definitions
pub const CATEGORY_TYPE: &str = "category";

fn default_true() -> bool {
    true
}

/// Definition file layout.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(rename = "Categories", default)]
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCategory {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(rename = "Settings", default)]
    pub settings: Vec<RawSetting>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSetting {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub default: serde_json::Value,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub children: Vec<RawSetting>,
}

impl RawDocument {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Categories that carry a key; the rest are ignored.
    pub fn keyed_categories(&self) -> impl Iterator<Item = (&str, &RawCategory)> {
        self.categories
            .iter()
            .filter_map(|c| c.key.as_deref().map(|key| (key, c)))
    }
}

/// Default values are stored as text whatever their JSON type.
pub(crate) fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One node of a definition tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingDefinition {
    pub key: String,
    pub label: String,
    pub type_name: String,
    pub default_value: String,
    pub unit: String,
    pub description: String,
    /// Initial visibility
    pub visible: bool,
    /// Keys of settings this one depends on
    pub requires: Vec<String>,
    /// Number of ancestors
    pub depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    subtree_end: usize,
}

impl SettingDefinition {
    pub fn is_category(&self) -> bool {
        self.type_name == CATEGORY_TYPE
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A definition tree stored flat in depth-first order.
///
/// Every definition's descendants directly follow it, so a subtree is a
/// contiguous index range.
#[derive(Clone, Debug, Default)]
pub struct DefinitionContainer {
    platform: Option<String>,
    definitions: Vec<SettingDefinition>,
}

impl DefinitionContainer {
    pub fn load(path: &Path) -> Result<Self> {
        let doc = RawDocument::load(path)?;
        let container = Self::from_document(&doc);
        log::info!(
            "Loaded {} setting definitions from {:?}",
            container.len(),
            path
        );
        Ok(container)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_document(&RawDocument::parse(json)?))
    }

    pub(crate) fn from_document(doc: &RawDocument) -> Self {
        let mut container = Self {
            platform: doc.platform.clone(),
            definitions: Vec::new(),
        };
        for (key, category) in doc.keyed_categories() {
            let index = container.push(
                SettingDefinition {
                    key: key.to_string(),
                    label: category.label.clone(),
                    type_name: CATEGORY_TYPE.to_string(),
                    default_value: String::new(),
                    unit: String::new(),
                    description: String::new(),
                    visible: category.visible,
                    requires: Vec::new(),
                    depth: 0,
                    parent: None,
                    children: Vec::new(),
                    subtree_end: 0,
                },
                None,
            );
            for setting in &category.settings {
                container.push_setting(setting, index);
            }
            container.close(index);
        }
        container
    }

    fn push(&mut self, mut definition: SettingDefinition, parent: Option<usize>) -> usize {
        let index = self.definitions.len();
        definition.parent = parent;
        definition.depth = parent.map_or(0, |p| self.definitions[p].depth + 1);
        self.definitions.push(definition);
        if let Some(p) = parent {
            self.definitions[p].children.push(index);
        }
        index
    }

    fn push_setting(&mut self, raw: &RawSetting, parent: usize) {
        let index = self.push(
            SettingDefinition {
                key: raw.key.clone(),
                label: raw.label.clone(),
                type_name: raw.type_name.clone(),
                default_value: value_to_string(&raw.default),
                unit: raw.unit.clone(),
                description: raw.description.clone(),
                visible: raw.visible,
                requires: raw.requires.clone(),
                depth: 0,
                parent: None,
                children: Vec::new(),
                subtree_end: 0,
            },
            Some(parent),
        );
        for child in &raw.children {
            self.push_setting(child, index);
        }
        self.close(index);
    }

    fn close(&mut self, index: usize) {
        self.definitions[index].subtree_end = self.definitions.len();
    }

    /// Mesh shown as the build platform
    pub fn platform_mesh(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definitions(&self) -> &[SettingDefinition] {
        &self.definitions
    }

    pub fn definition(&self, index: usize) -> Option<&SettingDefinition> {
        self.definitions.get(index)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.key == key)
    }

    pub fn find_definition(&self, key: &str) -> Option<&SettingDefinition> {
        self.index_of(key).map(|i| &self.definitions[i])
    }

    /// Indices of everything below `index`, in depth-first order.
    pub fn descendants(&self, index: usize) -> std::ops::Range<usize> {
        match self.definitions.get(index) {
            Some(d) => index + 1..d.subtree_end,
            None => 0..0,
        }
    }

    /// Indices of the ancestors of `index`, nearest first.
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(
            self.definitions.get(index).and_then(|d| d.parent),
            move |&i| self.definitions[i].parent,
        )
    }

    /// Definitions listing `key` in their `requires`.
    pub fn required_by(&self, key: &str) -> impl Iterator<Item = &SettingDefinition> + '_ {
        let key = key.to_string();
        self.definitions
            .iter()
            .filter(move |d| d.requires.iter().any(|r| *r == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "platform": "ultimaker_platform.stl",
        "Categories": [
            {
                "key": "resolution",
                "label": "Quality",
                "Settings": [
                    {
                        "key": "layer_height",
                        "label": "Layer Height",
                        "type": "float",
                        "default": 0.1,
                        "unit": "mm",
                        "children": [
                            { "key": "layer_height_0", "label": "Initial Layer Height", "type": "float", "default": 0.3 }
                        ]
                    },
                    { "key": "wall_thickness", "label": "Wall Thickness", "type": "float", "default": "0.8", "requires": ["layer_height"] }
                ]
            },
            { "label": "Unkeyed", "Settings": [ { "key": "lost" } ] },
            {
                "key": "speed",
                "label": "Speed",
                "Settings": [ { "key": "print_speed", "type": "int", "default": 50, "visible": false } ]
            }
        ]
    }"#;

    #[test]
    fn test_flattened_depth_first() {
        let container = DefinitionContainer::from_json(JSON).unwrap();
        let keys: Vec<&str> = container.definitions().iter().map(|d| d.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "resolution",
                "layer_height",
                "layer_height_0",
                "wall_thickness",
                "speed",
                "print_speed"
            ]
        );
        assert_eq!(container.platform_mesh(), Some("ultimaker_platform.stl"));
        assert!(container.find_definition("lost").is_none());
    }

    #[test]
    fn test_tree_links() {
        let container = DefinitionContainer::from_json(JSON).unwrap();
        let layer = container.index_of("layer_height_0").unwrap();
        assert_eq!(container.definitions()[layer].depth, 2);
        assert_eq!(container.ancestors(layer).collect::<Vec<_>>(), vec![1, 0]);
        assert_eq!(container.descendants(0), 1..4);
        assert!(container.definitions()[0].is_category());

        let speed = container.find_definition("print_speed").unwrap();
        assert_eq!(speed.default_value, "50");
        assert!(!speed.visible);
        assert_eq!(container.find_definition("wall_thickness").unwrap().default_value, "0.8");

        let dependents: Vec<&str> = container
            .required_by("layer_height")
            .map(|d| d.key.as_str())
            .collect();
        assert_eq!(dependents, vec!["wall_thickness"]);
    }

    #[test]
    fn test_invalid_json() {
        assert!(DefinitionContainer::from_json("{ not json").is_err());
    }
}
