//! Machine settings and setting definition models.
//!
//! Definitions come from a JSON file with a `"Categories"` list; each
//! category holds a `"Settings"` tree. [`MachineSettings`] keeps current
//! values and persists them as `<key> <value>` lines, while
//! [`SettingDefinitionsModel`] presents a definition tree as a flat,
//! filterable list of rows.

mod error;
mod definition;
mod machine_settings;
mod definitions_model;

pub use error::{Result, SettingsError};
pub use definition::{DefinitionContainer, SettingDefinition, CATEGORY_TYPE};
pub use machine_settings::{MachineSettings, Setting, SettingsCategory};
pub use definitions_model::{
    ModelChange, RelatedSetting, Role, RoleValue, SettingDefinitionsModel, SettingFilter,
};
