//! Axis gizmo state carried by tool handle nodes.

use lathe_math::Vec3;

/// A principal axis a handle can constrain a drag to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along the axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Component of `v` along this axis
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Hover and drag state of an axis gizmo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolHandle {
    active_axis: Option<Axis>,
    locked_axis: Option<Axis>,
}

impl ToolHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis highlighted under the cursor
    pub fn active_axis(&self) -> Option<Axis> {
        self.active_axis
    }

    pub fn set_active_axis(&mut self, axis: Option<Axis>) {
        self.active_axis = axis;
    }

    /// Axis the current drag is constrained to
    pub fn locked_axis(&self) -> Option<Axis> {
        self.locked_axis
    }

    pub fn set_locked_axis(&mut self, axis: Option<Axis>) {
        self.locked_axis = axis;
    }
}
