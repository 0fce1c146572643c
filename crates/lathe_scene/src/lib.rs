//! # lathe_scene - Scene graph and selection
//!
//! The scene is an arena of [`SceneNode`]s keyed by [`NodeId`], rooted at a
//! single root node. Parents own their children through the arena; the
//! parent link on a child is a plain id.
//!
//! ## Notifications
//!
//! Every structural or transform change is published as a [`SceneEvent`] to
//! all receivers obtained from [`Scene::subscribe`], so renderers and view
//! models can react without the scene knowing about them.

pub mod error;
pub mod node;
pub mod scene;
pub mod selection;
pub mod tool_handle;
pub mod camera;

pub use error::{SceneError, Result};
pub use node::{NodeId, SceneNode, MeshData};
pub use scene::{Scene, SceneEvent, DetachedSubtree, DepthFirstIter};
pub use selection::{Selection, SelectionMode};
pub use tool_handle::{Axis, ToolHandle};
pub use camera::{Camera, FixedCamera};
