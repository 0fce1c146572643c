//! Integration tests for lathe_editor
//!
//! Drives the editor the way a frontend would: raw input through the
//! devices, events through the controller, edits through the operation
//! stack.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use lathe_editor::settings::{DefinitionContainer, ModelChange, Role, RoleValue};
use lathe_editor::tools::{ROTATE_TOOL_ID, SCALE_TOOL_ID};
use lathe_editor::*;
use lathe_event::{Event, InputDevice, MouseButton, MouseDevice, RawInput};
use lathe_math::{Transform, Vec3};
use lathe_scene::{Axis, MeshData, NodeId, Scene, SceneNode};

/// Reports the Z handle anywhere near the screen origin.
struct ZHandle;

impl Renderer for ZHandle {
    fn pick_id_at(&self, x: f32, y: f32) -> Option<PickId> {
        (x.abs() < 0.5 && y.abs() < 0.5).then_some(PickId(3))
    }

    fn axis_for_id(&self, id: PickId) -> Option<Axis> {
        (id == PickId(3)).then_some(Axis::Z)
    }
}

fn editor_with_selection(count: usize) -> (Controller, Vec<NodeId>) {
    let mut controller = Controller::new(SceneContext::default(), Box::new(ZHandle));
    controller.register_tool(Box::new(TranslateTool::new()));
    controller.register_tool(Box::new(RotateTool::new()));
    controller.register_tool(Box::new(ScaleTool::new()));

    let ctx = controller.context_mut();
    let root = ctx.scene.root();
    let nodes: Vec<NodeId> = (0..count)
        .map(|i| {
            ctx.scene
                .add_node(SceneNode::new(format!("part{}", i)).with_selectable(true), root)
                .unwrap()
        })
        .collect();
    for &node in &nodes {
        ctx.selection.add(node);
    }
    (controller, nodes)
}

/// Feed raw mouse input through a device into the controller.
fn drive(controller: &mut Controller, mouse: &mut MouseDevice, queue: &Rc<RefCell<Vec<Event>>>, raw: RawInput) {
    mouse.handle_event(&raw);
    let events: Vec<Event> = queue.borrow_mut().drain(..).collect();
    for event in events {
        controller.event(&event);
    }
}

fn snapshot(scene: &Scene, nodes: &[NodeId]) -> Vec<Transform> {
    nodes.iter().map(|&n| scene.local_transform(n).unwrap()).collect()
}

#[test]
fn test_rotate_drag_pushes_one_operation_per_node() {
    let (mut controller, nodes) = editor_with_selection(2);
    assert!(controller.set_active_tool(Some(ROTATE_TOOL_ID)));

    let queue = Rc::new(RefCell::new(Vec::new()));
    let mut mouse = MouseDevice::new();
    let sink = queue.clone();
    mouse.subscribe(Box::new(move |event| sink.borrow_mut().push(*event)));

    drive(&mut controller, &mut mouse, &queue, RawInput::CursorMoved { x: 0.0, y: 0.0 });
    drive(&mut controller, &mut mouse, &queue, RawInput::MouseButton { button: MouseButton::Left, pressed: true });
    drive(&mut controller, &mut mouse, &queue, RawInput::CursorMoved { x: 0.0, y: 0.0 });
    assert_eq!(controller.context().operations.undo_count(), 0);

    // Top-down camera: screen y maps to world Z on the drag plane
    drive(&mut controller, &mut mouse, &queue, RawInput::CursorMoved { x: 0.0, y: 2.0 });
    assert_eq!(controller.context().operations.undo_count(), nodes.len());

    for &node in &nodes {
        let rotation = controller.context().scene.local_transform(node).unwrap().rotation;
        assert_abs_diff_eq!(rotation.x, 0.0);
        assert_abs_diff_eq!(rotation.y, 0.0);
        assert!(rotation.z > 0.0);
        assert_abs_diff_eq!(rotation.angle(), 2.0, epsilon = 1e-5);
    }

    drive(&mut controller, &mut mouse, &queue, RawInput::MouseButton { button: MouseButton::Left, pressed: false });
    assert!(controller.undo());
    assert!(controller.undo());
    let identity = vec![Transform::default(); nodes.len()];
    assert_eq!(snapshot(&controller.context().scene, &nodes), identity);
}

#[test]
fn test_undo_redo_laws() {
    let mut scene = Scene::new();
    let root = scene.root();
    let node = scene.add_node(SceneNode::new("cube"), root).unwrap();
    let mut stack = OperationStack::new();

    stack
        .push(Box::new(TranslateOperation::new(node, Vec3::new(1.0, 0.0, 0.0))), &mut scene)
        .unwrap();
    let before = scene.local_transform(node).unwrap();

    stack
        .push(Box::new(ScaleOperation::new(node, Vec3::new(2.0, 1.0, 1.0))), &mut scene)
        .unwrap();
    let after = scene.local_transform(node).unwrap();

    // push then undo restores exactly
    assert!(stack.undo(&mut scene).unwrap());
    assert_eq!(scene.local_transform(node).unwrap(), before);

    // undo then redo reproduces
    assert!(stack.redo(&mut scene).unwrap());
    assert_eq!(scene.local_transform(node).unwrap(), after);

    // push after undo drops the redo tail
    stack.undo(&mut scene).unwrap();
    stack
        .push(Box::new(RotateOperation::new(node, Vec3::Y, 0.5)), &mut scene)
        .unwrap();
    assert!(!stack.can_redo());
    assert_eq!(stack.undo_count(), 2);
}

#[test]
fn test_transaction_groups_tool_edits() {
    let (mut controller, nodes) = editor_with_selection(1);
    let ctx = controller.context_mut();
    ctx.operations.begin_transaction("Nudge");
    for _ in 0..3 {
        ctx.push_operation(Box::new(TranslateOperation::new(nodes[0], Vec3::X))).unwrap();
    }
    assert!(matches!(ctx.undo(), Err(OperationError::TransactionOpen(_))));
    ctx.operations.commit_transaction();

    assert_eq!(ctx.operations.undo_description(), Some("Nudge"));
    assert_eq!(ctx.scene.local_transform(nodes[0]).unwrap().position, Vec3::new(3.0, 0.0, 0.0));
    assert!(controller.undo());
    assert_eq!(controller.context().scene.local_transform(nodes[0]).unwrap().position, Vec3::ZERO);
}

#[test]
fn test_scale_tool_follows_selection_changes() {
    let (mut controller, nodes) = editor_with_selection(1);
    controller.set_active_tool(Some(SCALE_TOOL_ID));
    let handle = controller.active_tool().and_then(|t| t.handle()).unwrap();

    let ctx = controller.context_mut();
    ctx.scene.set_position(nodes[0], Vec3::new(4.0, 0.0, 0.0)).unwrap();
    controller.selection_changed();
    assert_eq!(
        controller.context().scene.global_position(handle),
        Some(Vec3::new(4.0, 0.0, 0.0))
    );

    controller.context_mut().selection.clear();
    controller.selection_changed();
    assert!(!controller.context().scene.is_attached(handle));
}

struct Ascii;

impl MeshReader for Ascii {
    fn extension(&self) -> &str {
        "txt"
    }

    fn description(&self) -> &str {
        "Vertex List"
    }

    /// One `x y z` vertex per line, faces implied by consecutive triples.
    fn read(&self, path: &Path) -> Result<MeshData, MeshError> {
        let content = fs::read_to_string(path)?;
        let mut vertices = Vec::new();
        for line in content.lines() {
            let coords: Vec<f32> = line
                .split_whitespace()
                .map(|t| t.parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|e| MeshError::Parse { path: path.to_path_buf(), message: e.to_string() })?;
            if coords.len() != 3 {
                return Err(MeshError::Parse {
                    path: path.to_path_buf(),
                    message: format!("expected 3 coordinates, got {}", coords.len()),
                });
            }
            vertices.push(Vec3::new(coords[0], coords[1], coords[2]));
        }
        let indices = (0..vertices.len() as u32).collect();
        Ok(MeshData::new(vertices, indices))
    }
}

#[test]
fn test_mesh_loader_reads_files_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("wedge.txt");
    let bad = dir.path().join("broken.txt");
    fs::write(&good, "0 0 0\n1 0 0\n0 1 0\n").unwrap();
    fs::write(&bad, "0 0\n").unwrap();

    let mut handler = MeshFileHandler::new();
    handler.add_reader(Arc::new(Ascii));
    assert_eq!(
        handler.supported_read_file_types(),
        vec![
            "All Supported Types (*.txt)".to_string(),
            "Vertex List (*.txt)".to_string(),
            "All Files (*)".to_string(),
        ]
    );

    let mut loader = MeshLoader::new(handler);
    let mut ctx = SceneContext::default();
    loader.read_local_file(&good);
    loader.read_local_file(&bad);
    let added = loader.wait_finished(&mut ctx, Duration::from_secs(10));

    assert_eq!(added.len(), 1);
    let node = ctx.scene.node(added[0]).unwrap();
    assert_eq!(node.name, "wedge.txt");
    assert_eq!(node.mesh.as_ref().unwrap().vertex_count(), 3);
    assert_eq!(ctx.preferences.recent_files.first(), Some(&good));
    assert_eq!(ctx.preferences.last_mesh_directory.as_deref(), Some(dir.path()));
}

const MACHINE_JSON: &str = r#"{
    "platform": "printer_platform.stl",
    "Categories": [
        {
            "key": "resolution",
            "label": "Quality",
            "Settings": [
                { "key": "layer_height", "label": "Layer Height", "type": "float", "default": 0.1, "unit": "mm" },
                { "key": "wall_thickness", "label": "Wall Thickness", "type": "float", "default": 0.8,
                  "requires": ["layer_height"],
                  "children": [ { "key": "wall_line_count", "label": "Wall Line Count", "type": "int", "default": 2 } ] }
            ]
        },
        {
            "key": "material",
            "label": "Material",
            "Settings": [ { "key": "print_temperature", "label": "Printing Temperature", "type": "float", "default": 210, "unit": "C" } ]
        }
    ]
}"#;

#[test]
fn test_machine_settings_round_trip_through_values_file() {
    let dir = tempfile::tempdir().unwrap();
    let definitions = dir.path().join("machine.json");
    let values = dir.path().join("machine.values");
    fs::write(&definitions, MACHINE_JSON).unwrap();

    let mut settings = MachineSettings::new();
    settings.load_settings_from_file(&definitions).unwrap();
    settings.set_setting_value_by_key("print_temperature", "200");
    settings.set_setting_value_by_key("nonexistent_key", "5");
    settings.save_values_to_file(&values).unwrap();

    let mut reloaded = MachineSettings::new();
    reloaded.load_settings_from_file(&definitions).unwrap();
    assert_eq!(reloaded.load_values_from_file(&values).unwrap(), 4);
    assert_eq!(reloaded.get_setting_value_by_key("print_temperature"), Some("200"));
    assert_eq!(reloaded.get_setting_value_by_key("wall_line_count"), Some("2"));
    assert_eq!(reloaded.platform_mesh(), Some("printer_platform.stl"));
}

#[test]
fn test_definitions_model_publishes_row_changes() {
    let container = DefinitionContainer::from_json(MACHINE_JSON).unwrap();
    let mut model = SettingDefinitionsModel::new(container);
    let changes = model.subscribe();
    assert_eq!(model.row_count(), 2);

    model.expand("resolution");
    let published: Vec<ModelChange> = changes.try_iter().collect();
    assert_eq!(
        published,
        vec![
            ModelChange::RowsInserted { row: 1 },
            ModelChange::RowsInserted { row: 2 },
            ModelChange::VisibleCountChanged,
        ]
    );
    assert_eq!(model.data(2, Role::Key), Some(RoleValue::Text("wall_thickness".into())));
    assert_eq!(model.data(1, Role::Unit), Some(RoleValue::Text("mm".into())));

    model.hide("layer_height");
    let published: Vec<ModelChange> = changes.try_iter().collect();
    assert!(published.contains(&ModelChange::DataChanged { row: 1, role: Role::Visible }));
    assert!(published.contains(&ModelChange::RowsRemoved { row: 1 }));
    assert_eq!(model.get_index("wall_thickness"), Some(1));
}
