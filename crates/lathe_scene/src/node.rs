//! Scene nodes and their identifiers.

use std::sync::atomic::{AtomicU64, Ordering};

use lathe_math::{Mat4, Transform, Vec3};

use crate::tool_handle::ToolHandle;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique scene node identifier.
///
/// Ids come from a global atomic counter so nodes can be built on a worker
/// thread (mesh loading) before they are inserted into a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Triangle mesh attached to a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// A node in the scene tree.
///
/// Hierarchy links and the cached global matrix are maintained by
/// [`Scene`](crate::Scene); only payload fields are public.
#[derive(Clone, Debug)]
pub struct SceneNode {
    id: NodeId,
    /// Display name
    pub name: String,
    /// Whether the user may select this node
    pub selectable: bool,
    /// Whether the node is rendered
    pub visible: bool,
    /// Mesh payload, if any
    pub mesh: Option<MeshData>,
    /// Axis gizmo payload for tool handle nodes
    pub tool_handle: Option<ToolHandle>,
    pub(crate) transform: Transform,
    pub(crate) global: Mat4,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    /// Create a detached node with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            selectable: false,
            visible: true,
            mesh: None,
            tool_handle: None,
            transform: Transform::IDENTITY,
            global: Mat4::IDENTITY,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a detached, non-selectable tool handle node.
    pub fn new_tool_handle(name: impl Into<String>) -> Self {
        let mut node = Self::new(name);
        node.tool_handle = Some(ToolHandle::new());
        node
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.global = transform.to_matrix();
        self
    }

    pub fn with_position(self, position: Vec3) -> Self {
        let transform = self.transform.with_position(position);
        self.with_transform(transform)
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Local transform relative to the parent
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Cached global matrix
    pub fn global_transform(&self) -> Mat4 {
        self.global
    }

    /// Cached global position
    pub fn global_position(&self) -> Vec3 {
        self.global.get_translation()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_tool_handle(&self) -> bool {
        self.tool_handle.is_some()
    }
}
