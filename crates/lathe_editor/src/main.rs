//! Lathe headless driver
//!
//! Builds an editor context without a window, feeds it a short scripted
//! input sequence through the input devices and logs what the tools did.

use crossbeam_channel::unbounded;
use winit::keyboard::Key as WinitKey;

use lathe_editor::{
    queue_events,
    tools::{ROTATE_TOOL_ID, TRANSLATE_TOOL_ID},
    Controller, PickId, Preferences, Renderer, RotateTool, ScaleTool, SceneContext, TranslateTool,
};
use lathe_event::{InputDevice, KeyDevice, MouseButton, MouseDevice, RawInput};
use lathe_math::Vec3;
use lathe_scene::{Axis, FixedCamera, SceneNode};

/// Picks the handle axis from a fixed screen region around the origin.
struct ScriptedRenderer;

impl Renderer for ScriptedRenderer {
    fn pick_id_at(&self, x: f32, y: f32) -> Option<PickId> {
        if x.abs() > 1.0 || y.abs() > 1.0 {
            return None;
        }
        // X handle to the right, Z handle everywhere else near the centre
        if x > 0.5 {
            Some(PickId(1))
        } else {
            Some(PickId(3))
        }
    }

    fn axis_for_id(&self, id: PickId) -> Option<Axis> {
        match id.0 {
            1 => Some(Axis::X),
            2 => Some(Axis::Y),
            3 => Some(Axis::Z),
            _ => None,
        }
    }
}

fn key(c: &str, pressed: bool) -> RawInput {
    RawInput::Key {
        key: WinitKey::Character(c.into()),
        pressed,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("{} v{}", lathe_editor::NAME, lathe_editor::VERSION);

    let preferences = match Preferences::default_path() {
        Some(path) => Preferences::load_or_default(&path),
        None => Preferences::default(),
    };
    let context = SceneContext::new(Box::new(FixedCamera::top_down(10.0)), preferences);
    let mut controller = Controller::new(context, Box::new(ScriptedRenderer));
    controller.register_tool(Box::new(TranslateTool::new()));
    controller.register_tool(Box::new(RotateTool::new()));
    controller.register_tool(Box::new(ScaleTool::new()));

    let ctx = controller.context_mut();
    let root = ctx.scene.root();
    let cube = match ctx.scene.add_node(SceneNode::new("cube").with_position(Vec3::ZERO), root) {
        Ok(id) => id,
        Err(err) => {
            log::error!("Could not create the demo node: {}", err);
            return;
        }
    };
    ctx.selection.add(cube);

    // Devices publish into one queue; the controller drains it.
    let (tx, rx) = unbounded();
    let mut keys = KeyDevice::new();
    let mut mouse = MouseDevice::new();
    keys.subscribe(queue_events(tx.clone()));
    mouse.subscribe(queue_events(tx));

    let script = [
        key("e", true),
        key("e", false),
        RawInput::CursorMoved { x: 0.0, y: 0.0 },
        RawInput::MouseButton { button: MouseButton::Left, pressed: true },
        RawInput::CursorMoved { x: 0.0, y: 0.5 },
        RawInput::CursorMoved { x: 0.0, y: 2.0 },
        RawInput::MouseButton { button: MouseButton::Left, pressed: false },
    ];
    for raw in &script {
        match raw {
            RawInput::Key { .. } => keys.handle_event(raw),
            _ => mouse.handle_event(raw),
        }
        for event in rx.try_iter() {
            controller.event(&event);
        }
    }

    let ctx = controller.context();
    if let Some(transform) = ctx.scene.local_transform(cube) {
        log::info!(
            "After rotate drag: rotation {:?}, {} operation(s) on the stack",
            transform.rotation,
            ctx.operations.undo_count()
        );
    }

    controller.undo();
    if let Some(transform) = controller.context().scene.local_transform(cube) {
        log::info!("After undo: rotation {:?}", transform.rotation);
    }

    controller.set_active_tool(Some(TRANSLATE_TOOL_ID));
    controller.set_active_tool(Some(ROTATE_TOOL_ID));
    controller.set_active_tool(None);
    log::info!(
        "Done: {} undo step(s), {} redo step(s)",
        controller.context().operations.undo_count(),
        controller.context().operations.redo_count()
    );
}
