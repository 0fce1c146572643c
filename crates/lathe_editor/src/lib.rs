//! Lathe Editor
//!
//! Application layer of the Lathe 3D editor: interactive manipulation
//! tools, the undo/redo operation stack, mesh loading and machine settings.
//!
//! ## Architecture
//!
//! ```text
//! RawInput → InputDevice → Event → Controller → Tool → Operation → Scene
//! ```
//!
//! All scene modifications made by tools go through the operation stack so
//! they can be undone. There is no global state: the scene, selection,
//! operation stack, camera and preferences travel together in a
//! [`SceneContext`].

pub mod operations;
pub mod context;
pub mod tools;
pub mod controller;
pub mod mesh;
pub mod settings;
pub mod preferences;

pub use operations::{
    Operation,
    OperationError,
    OperationResult,
    OperationStack,
    GroupedOperation,
    RotateOperation,
    TranslateOperation,
    ScaleOperation,
    SetTransformOperation,
    AddSceneNodeOperation,
    RemoveSceneNodeOperation,
    SetParentOperation,
};

pub use context::SceneContext;

pub use tools::{
    Tool,
    ToolId,
    Renderer,
    PickId,
    RotateTool,
    TranslateTool,
    ScaleTool,
};

pub use controller::{queue_events, Controller};

pub use mesh::{
    MeshError,
    MeshFileHandler,
    MeshLoader,
    MeshReader,
    MeshWriter,
    ReadMeshJob,
    JobFinished,
};

pub use settings::{
    MachineSettings,
    SettingDefinitionsModel,
    SettingsError,
};

pub use preferences::{Preferences, PreferencesError};

/// Editor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Editor name
pub const NAME: &str = "Lathe";
