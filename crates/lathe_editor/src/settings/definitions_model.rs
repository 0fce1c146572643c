//! Flattened, filterable list view of a definition tree.
//!
//! The model keeps two lists: every definition under the root in
//! depth-first order, and the subset currently shown as rows. Changing the
//! expanded, visible, exclude or filter state recomputes the rows and
//! publishes the inserted and removed rows as [`ModelChange`] messages.

use std::collections::HashSet;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::definition::{DefinitionContainer, SettingDefinition};

/// Data a row exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Key,
    Depth,
    Visible,
    Expanded,
    Label,
    Type,
    DefaultValue,
    Unit,
    Description,
}

/// Value returned by [`SettingDefinitionsModel::data`].
#[derive(Clone, Debug, PartialEq)]
pub enum RoleValue {
    Text(String),
    Number(usize),
    Flag(bool),
}

type Accessor = fn(&SettingDefinitionsModel, &SettingDefinition) -> RoleValue;

struct RoleEntry {
    role: Role,
    name: &'static str,
    accessor: Accessor,
}

fn role_table() -> Vec<RoleEntry> {
    vec![
        RoleEntry { role: Role::Key, name: "key", accessor: |_, d| RoleValue::Text(d.key.clone()) },
        RoleEntry { role: Role::Depth, name: "depth", accessor: |_, d| RoleValue::Number(d.depth) },
        RoleEntry {
            role: Role::Visible,
            name: "visible",
            accessor: |m, d| RoleValue::Flag(m.visible.contains(&d.key)),
        },
        RoleEntry {
            role: Role::Expanded,
            name: "expanded",
            accessor: |m, d| RoleValue::Flag(m.expanded.contains(&d.key)),
        },
        RoleEntry { role: Role::Label, name: "label", accessor: |_, d| RoleValue::Text(d.label.clone()) },
        RoleEntry { role: Role::Type, name: "type", accessor: |_, d| RoleValue::Text(d.type_name.clone()) },
        RoleEntry {
            role: Role::DefaultValue,
            name: "default_value",
            accessor: |_, d| RoleValue::Text(d.default_value.clone()),
        },
        RoleEntry { role: Role::Unit, name: "unit", accessor: |_, d| RoleValue::Text(d.unit.clone()) },
        RoleEntry {
            role: Role::Description,
            name: "description",
            accessor: |_, d| RoleValue::Text(d.description.clone()),
        },
    ]
}

/// Row change notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelChange {
    RowsInserted { row: usize },
    RowsRemoved { row: usize },
    /// Every row may have changed
    Reset,
    DataChanged { row: usize, role: Role },
    VisibleCountChanged,
}

/// Key/label filter. Patterns compare case-insensitively; `*` matches any
/// run of characters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingFilter {
    pub key: Option<String>,
    pub label: Option<String>,
}

impl SettingFilter {
    pub fn key(pattern: impl Into<String>) -> Self {
        Self { key: Some(pattern.into()), label: None }
    }

    pub fn label(pattern: impl Into<String>) -> Self {
        Self { key: None, label: Some(pattern.into()) }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.label.is_none()
    }

    pub fn matches(&self, definition: &SettingDefinition) -> bool {
        let key_ok = self.key.as_deref().map_or(true, |p| wildcard_match(p, &definition.key));
        let label_ok = self
            .label
            .as_deref()
            .map_or(true, |p| wildcard_match(p, &definition.label));
        key_ok && label_ok
    }
}

fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let text = text.to_lowercase();
    if !pattern.contains('*') {
        return pattern == text;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let last = parts.len() - 1;
    let mut rest = text.as_str();
    for (i, part) in parts.iter().enumerate() {
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == last {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

/// A setting related to another through `requires`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedSetting {
    pub key: String,
    pub label: String,
}

/// List model over a [`DefinitionContainer`].
pub struct SettingDefinitionsModel {
    container: DefinitionContainer,
    root: Option<usize>,
    /// Container indices under the root, depth-first
    definitions: Vec<usize>,
    /// Positions in `definitions` currently shown, ascending
    rows: Vec<usize>,
    expanded: HashSet<String>,
    visible: HashSet<String>,
    exclude: HashSet<String>,
    show_all: bool,
    filter: SettingFilter,
    roles: Vec<RoleEntry>,
    subscribers: Vec<Sender<ModelChange>>,
}

impl Default for SettingDefinitionsModel {
    fn default() -> Self {
        Self::new(DefinitionContainer::default())
    }
}

impl SettingDefinitionsModel {
    /// Build a model over `container`. Definitions marked visible, categories
    /// included, start visible; nothing starts expanded.
    pub fn new(container: DefinitionContainer) -> Self {
        let mut model = Self {
            container: DefinitionContainer::default(),
            root: None,
            definitions: Vec::new(),
            rows: Vec::new(),
            expanded: HashSet::new(),
            visible: HashSet::new(),
            exclude: HashSet::new(),
            show_all: false,
            filter: SettingFilter::default(),
            roles: role_table(),
            subscribers: Vec::new(),
        };
        model.set_container(container);
        model
    }

    /// Replace the definitions. Resets root, visibility and rows.
    pub fn set_container(&mut self, container: DefinitionContainer) {
        self.visible = container
            .definitions()
            .iter()
            .filter(|d| d.visible)
            .map(|d| d.key.clone())
            .collect();
        self.container = container;
        self.root = None;
        self.reset();
    }

    pub fn container(&self) -> &DefinitionContainer {
        &self.container
    }

    /// Limit the model to the definitions below `key`. An empty key shows
    /// the whole container. Returns false for an unknown key.
    pub fn set_root_key(&mut self, key: &str) -> bool {
        let root = if key.is_empty() {
            None
        } else {
            match self.container.index_of(key) {
                Some(index) => Some(index),
                None => {
                    log::warn!("Tried to set the settings root to unknown definition '{}'", key);
                    return false;
                }
            }
        };
        if root != self.root {
            self.root = root;
            self.reset();
        }
        true
    }

    pub fn root_key(&self) -> Option<&str> {
        self.root
            .and_then(|i| self.container.definition(i))
            .map(|d| d.key.as_str())
    }

    /// Receive every subsequent [`ModelChange`].
    pub fn subscribe(&mut self) -> Receiver<ModelChange> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, change: ModelChange) {
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    fn reset(&mut self) {
        self.definitions = match self.root {
            Some(root) => self.container.descendants(root).collect(),
            None => (0..self.container.len()).collect(),
        };
        self.rows = (0..self.definitions.len())
            .filter(|&pos| self.is_definition_visible(self.definitions[pos]))
            .collect();
        self.emit(ModelChange::Reset);
        self.emit(ModelChange::VisibleCountChanged);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_definition(&self, row: usize) -> Option<&SettingDefinition> {
        let pos = *self.rows.get(row)?;
        self.container.definition(self.definitions[pos])
    }

    /// Value of `role` for `row`, or `None` when the row does not exist.
    pub fn data(&self, row: usize, role: Role) -> Option<RoleValue> {
        let definition = self.row_definition(row)?;
        let entry = self.roles.iter().find(|e| e.role == role)?;
        Some((entry.accessor)(self, definition))
    }

    /// Role names in registration order.
    pub fn role_names(&self) -> Vec<(Role, &'static str)> {
        self.roles.iter().map(|e| (e.role, e.name)).collect()
    }

    /// Row showing `key`, if it is shown.
    pub fn get_index(&self, key: &str) -> Option<usize> {
        let index = self.container.index_of(key)?;
        let pos = self.definitions.iter().position(|&i| i == index)?;
        self.rows.iter().position(|&p| p == pos)
    }

    pub fn visible_count(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|&pos| self.container.definition(self.definitions[pos]))
            .filter(|d| self.visible.contains(&d.key))
            .count()
    }

    pub fn category_count(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|&pos| self.container.definition(self.definitions[pos]))
            .filter(|d| d.is_category())
            .count()
    }

    /// Show the children of `key`.
    pub fn expand(&mut self, key: &str) {
        self.expanded.insert(key.to_string());
        self.update_visible_rows();
    }

    /// Show the children of `key` and of every descendant that has children.
    pub fn expand_all(&mut self, key: &str) {
        let Some(index) = self.container.index_of(key) else {
            return;
        };
        let keys: Vec<String> = std::iter::once(index)
            .chain(self.container.descendants(index))
            .filter_map(|i| self.container.definition(i))
            .filter(|d| d.has_children())
            .map(|d| d.key.clone())
            .collect();
        self.expanded.extend(keys);
        self.update_visible_rows();
    }

    /// Hide the children of `key`, collapsing every expanded descendant too.
    pub fn collapse(&mut self, key: &str) {
        if !self.expanded.contains(key) {
            return;
        }
        let Some(index) = self.container.index_of(key) else {
            return;
        };
        self.expanded.remove(key);
        for i in self.container.descendants(index) {
            if let Some(d) = self.container.definition(i) {
                self.expanded.remove(&d.key);
            }
        }
        self.update_visible_rows();
    }

    /// Replace the expanded set. `"*"` expands every definition that has
    /// children.
    pub fn set_expanded<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut expanded = HashSet::new();
        for key in keys {
            let key = key.as_ref();
            if key == "*" {
                expanded.extend(
                    self.definitions
                        .iter()
                        .filter_map(|&i| self.container.definition(i))
                        .filter(|d| d.has_children())
                        .map(|d| d.key.clone()),
                );
            } else {
                expanded.insert(key.to_string());
            }
        }
        if expanded != self.expanded {
            self.expanded = expanded;
            self.update_visible_rows();
        }
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn show(&mut self, key: &str) {
        self.set_visible(key, true);
    }

    pub fn hide(&mut self, key: &str) {
        self.set_visible(key, false);
    }

    /// Change one definition's visibility.
    pub fn set_visible(&mut self, key: &str, visible: bool) {
        if self.visible.contains(key) == visible {
            return;
        }
        if self.container.index_of(key).is_none() {
            log::error!("Tried to change visibility of unknown setting '{}'", key);
            return;
        }

        if visible {
            self.visible.insert(key.to_string());
        } else {
            self.visible.remove(key);
        }
        if let Some(row) = self.get_index(key) {
            self.emit(ModelChange::DataChanged { row, role: Role::Visible });
        }
        self.update_visible_rows();
    }

    /// Show or hide every non-category definition currently in a row.
    pub fn set_all_visible(&mut self, visible: bool) {
        let keys: Vec<String> = self
            .rows
            .iter()
            .filter_map(|&pos| self.container.definition(self.definitions[pos]))
            .filter(|d| !d.is_category())
            .map(|d| d.key.clone())
            .collect();
        for key in keys {
            if visible {
                self.visible.insert(key);
            } else {
                self.visible.remove(&key);
            }
        }
        for row in 0..self.rows.len() {
            self.emit(ModelChange::DataChanged { row, role: Role::Visible });
        }
        self.update_visible_rows();
    }

    pub fn visible(&self) -> &HashSet<String> {
        &self.visible
    }

    /// Definitions that are never shown, along with their descendants.
    pub fn set_exclude<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exclude: HashSet<String> = keys.into_iter().map(Into::into).collect();
        if exclude != self.exclude {
            self.exclude = exclude;
            self.update_visible_rows();
        }
    }

    pub fn set_filter(&mut self, filter: SettingFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.update_visible_rows();
        }
    }

    /// Show definitions regardless of their visible state.
    pub fn set_show_all(&mut self, show_all: bool) {
        if show_all != self.show_all {
            self.show_all = show_all;
            self.update_visible_rows();
        }
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// Settings that `key` requires.
    ///
    /// The definition format lists required keys without the property they
    /// come from, so there is no per-role filter.
    pub fn get_requires(&self, key: &str) -> Vec<RelatedSetting> {
        let Some(definition) = self.container.find_definition(key) else {
            return Vec::new();
        };
        definition
            .requires
            .iter()
            .filter_map(|k| self.container.find_definition(k))
            .map(|d| RelatedSetting { key: d.key.clone(), label: d.label.clone() })
            .collect()
    }

    /// Settings whose `requires` names `key`. Unfiltered by role, like
    /// [`SettingDefinitionsModel::get_requires`].
    pub fn get_required_by(&self, key: &str) -> Vec<RelatedSetting> {
        if self.container.find_definition(key).is_none() {
            return Vec::new();
        }
        self.container
            .required_by(key)
            .map(|d| RelatedSetting { key: d.key.clone(), label: d.label.clone() })
            .collect()
    }

    /// Recompute the rows, publishing each inserted and removed row.
    fn update_visible_rows(&mut self) {
        let shown: Vec<bool> = self
            .definitions
            .iter()
            .map(|&i| self.is_definition_visible(i))
            .collect();

        for (pos, &show) in shown.iter().enumerate() {
            if show {
                if let Err(row) = self.rows.binary_search(&pos) {
                    self.rows.insert(row, pos);
                    self.emit(ModelChange::RowsInserted { row });
                }
            }
        }
        for (pos, &show) in shown.iter().enumerate() {
            if !show {
                if let Ok(row) = self.rows.binary_search(&pos) {
                    self.rows.remove(row);
                    self.emit(ModelChange::RowsRemoved { row });
                }
            }
        }
        self.emit(ModelChange::VisibleCountChanged);
    }

    fn is_definition_visible(&self, index: usize) -> bool {
        let Some(definition) = self.container.definition(index) else {
            return false;
        };

        if self.exclude.contains(&definition.key) {
            return false;
        }
        if self
            .container
            .ancestors(index)
            .filter_map(|a| self.container.definition(a))
            .any(|a| self.exclude.contains(&a.key))
        {
            return false;
        }

        // The root's direct children are top level.
        if let Some(parent) = definition.parent().filter(|&p| Some(p) != self.root) {
            let expanded = self
                .container
                .definition(parent)
                .is_some_and(|p| self.expanded.contains(&p.key));
            if !expanded {
                return false;
            }
        }

        if !self.show_all && !self.visible.contains(&definition.key) {
            return false;
        }
        if !self.filter.is_empty() && !self.filter.matches(definition) {
            return false;
        }

        // Empty categories are hidden
        !definition.is_category() || self.is_any_descendant_visible(index)
    }

    fn is_any_descendant_visible(&self, index: usize) -> bool {
        if self.show_all {
            return true;
        }
        let Some(definition) = self.container.definition(index) else {
            return false;
        };
        definition.children().iter().any(|&child| {
            let Some(c) = self.container.definition(child) else {
                return false;
            };
            if self.exclude.contains(&c.key) {
                return false;
            }
            if !self.filter.is_empty() && !self.filter.matches(c) {
                return false;
            }
            self.visible.contains(&c.key) || self.is_any_descendant_visible(child)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "Categories": [
            {
                "key": "resolution",
                "label": "Quality",
                "Settings": [
                    { "key": "layer_height", "label": "Layer Height", "type": "float", "default": 0.1, "unit": "mm",
                      "children": [ { "key": "layer_height_0", "label": "Initial Layer Height", "default": 0.3 } ] },
                    { "key": "wall_thickness", "label": "Wall Thickness", "requires": ["layer_height"] }
                ]
            },
            {
                "key": "speed",
                "label": "Speed",
                "Settings": [ { "key": "print_speed", "label": "Print Speed", "visible": false } ]
            }
        ]
    }"#;

    fn model() -> SettingDefinitionsModel {
        SettingDefinitionsModel::new(DefinitionContainer::from_json(JSON).unwrap())
    }

    fn keys(model: &SettingDefinitionsModel) -> Vec<String> {
        (0..model.row_count())
            .filter_map(|row| match model.data(row, Role::Key) {
                Some(RoleValue::Text(key)) => Some(key),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_collapsed_shows_nonempty_categories() {
        let model = model();
        assert_eq!(keys(&model), vec!["resolution"]);
        assert_eq!(model.category_count(), 1);
        assert_eq!(model.visible_count(), 1);
    }

    #[test]
    fn test_expand_and_collapse() {
        let mut model = model();
        let changes = model.subscribe();

        model.expand("resolution");
        assert_eq!(keys(&model), vec!["resolution", "layer_height", "wall_thickness"]);
        assert_eq!(changes.try_recv(), Ok(ModelChange::RowsInserted { row: 1 }));
        assert_eq!(changes.try_recv(), Ok(ModelChange::RowsInserted { row: 2 }));
        assert_eq!(changes.try_recv(), Ok(ModelChange::VisibleCountChanged));

        model.expand_all("resolution");
        assert_eq!(model.get_index("layer_height_0"), Some(2));
        assert_eq!(model.data(2, Role::Depth), Some(RoleValue::Number(2)));

        model.collapse("resolution");
        assert_eq!(keys(&model), vec!["resolution"]);
        assert!(model.expanded().is_empty());
    }

    #[test]
    fn test_set_expanded_wildcard() {
        let mut model = model();
        model.set_expanded(["*"]);
        assert!(model.expanded().contains("layer_height"));
        assert!(model.expanded().contains("speed"));
        assert_eq!(model.row_count(), 4);
    }

    #[test]
    fn test_visibility_and_show_all() {
        let mut model = model();
        model.set_expanded(["*"]);
        assert_eq!(model.get_index("speed"), None);

        model.show("print_speed");
        assert_eq!(model.get_index("print_speed"), Some(5));
        assert_eq!(model.data(5, Role::Visible), Some(RoleValue::Flag(true)));

        model.set_all_visible(false);
        assert_eq!(model.row_count(), 0);

        model.set_show_all(true);
        assert_eq!(model.row_count(), 6);
        // Only the categories are left in the visible set
        assert_eq!(model.visible_count(), 2);
    }

    #[test]
    fn test_exclude_and_filter() {
        let mut model = model();
        model.set_expanded(["*"]);
        model.set_exclude(["layer_height"]);
        assert_eq!(keys(&model), vec!["resolution", "wall_thickness"]);

        model.set_exclude(Vec::<String>::new());
        model.set_filter(SettingFilter::label("*layer*"));
        assert_eq!(keys(&model), vec!["layer_height", "layer_height_0"]);
    }

    #[test]
    fn test_hidden_category_stays_hidden() {
        let mut model = model();
        model.set_expanded(["*"]);
        model.hide("resolution");
        assert_eq!(model.get_index("resolution"), None);
        // Children only depend on the category being expanded
        assert_eq!(model.get_index("layer_height"), Some(0));

        model.show("print_speed");
        assert_eq!(
            keys(&model),
            vec!["layer_height", "layer_height_0", "wall_thickness", "speed", "print_speed"]
        );

        model.show("resolution");
        assert_eq!(model.get_index("resolution"), Some(0));
    }

    #[test]
    fn test_root_key() {
        let mut model = model();
        assert!(model.set_root_key("layer_height"));
        assert_eq!(keys(&model), vec!["layer_height_0"]);
        assert!(!model.set_root_key("missing"));
        assert_eq!(model.root_key(), Some("layer_height"));
    }

    #[test]
    fn test_roles_and_relations() {
        let model = model();
        let names: Vec<&str> = model.role_names().into_iter().map(|(_, n)| n).collect();
        assert_eq!(
            names,
            vec!["key", "depth", "visible", "expanded", "label", "type", "default_value", "unit", "description"]
        );
        assert_eq!(model.data(0, Role::Label), Some(RoleValue::Text("Quality".into())));
        assert_eq!(model.data(7, Role::Key), None);

        let requires = model.get_requires("wall_thickness");
        assert_eq!(requires[0].key, "layer_height");
        let required_by = model.get_required_by("layer_height");
        assert_eq!(required_by[0].label, "Wall Thickness");
        assert!(model.get_required_by("missing").is_empty());
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("layer*", "Layer Height"));
        assert!(wildcard_match("*height", "Layer Height"));
        assert!(wildcard_match("*er h*", "Layer Height"));
        assert!(!wildcard_match("speed", "print_speed"));
    }
}
