//! Tool registry and event routing.

use std::collections::HashMap;

use crossbeam_channel::Sender;
use lathe_event::{Event, EventHandler, Key, Modifiers};
use lathe_scene::NodeId;

use crate::context::SceneContext;
use crate::operations::{GroupedOperation, Operation, RemoveSceneNodeOperation};
use crate::tools::{Renderer, Tool, ToolId};

/// Device subscriber that forwards every event into `queue`, for a
/// controller to drain on its own thread.
pub fn queue_events(queue: Sender<Event>) -> EventHandler {
    Box::new(move |event| {
        if queue.send(*event).is_err() {
            log::debug!("Event queue closed, dropping {:?}", event);
        }
    })
}

/// Owns the tools and the scene context, and routes events to the active
/// tool. Events the tool does not consume fall through to the editor
/// shortcuts.
pub struct Controller {
    tools: HashMap<ToolId, Box<dyn Tool>>,
    active_tool: Option<ToolId>,
    previous_tool: Option<ToolId>,
    context: SceneContext,
    renderer: Box<dyn Renderer>,
}

impl Controller {
    pub fn new(context: SceneContext, renderer: Box<dyn Renderer>) -> Self {
        Self {
            tools: HashMap::new(),
            active_tool: None,
            previous_tool: None,
            context,
            renderer,
        }
    }

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    /// Register a tool, replacing any tool with the same id.
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) {
        let id = tool.id();
        if self.tools.insert(id, tool).is_some() {
            log::warn!("Replaced tool '{}'", id);
        }
    }

    pub fn tool(&self, id: ToolId) -> Option<&dyn Tool> {
        self.tools.get(&id).map(|t| t.as_ref())
    }

    /// Get all registered tool IDs.
    pub fn tool_ids(&self) -> impl Iterator<Item = ToolId> + '_ {
        self.tools.keys().copied()
    }

    pub fn active_tool_id(&self) -> Option<ToolId> {
        self.active_tool
    }

    pub fn active_tool(&self) -> Option<&dyn Tool> {
        self.active_tool.and_then(|id| self.tool(id))
    }

    /// Find tool by shortcut key.
    pub fn find_by_shortcut(&self, key: char) -> Option<ToolId> {
        let key = key.to_ascii_lowercase();
        self.tools
            .iter()
            .find(|(_, tool)| tool.shortcut() == Some(key))
            .map(|(id, _)| *id)
    }

    fn send_to(&mut self, id: ToolId, event: &Event) -> bool {
        match self.tools.get_mut(&id) {
            Some(tool) => tool.event(event, &mut self.context, self.renderer.as_ref()),
            None => false,
        }
    }

    /// Switch tools. The old tool receives `ToolDeactivate`, the new one
    /// `ToolActivate`. Returns whether the active tool changed.
    pub fn set_active_tool(&mut self, id: Option<ToolId>) -> bool {
        if id == self.active_tool {
            return false;
        }
        if let Some(new_id) = id {
            if !self.tools.contains_key(&new_id) {
                log::warn!("Unknown tool '{}'", new_id);
                return false;
            }
        }

        if let Some(current) = self.active_tool {
            self.send_to(current, &Event::ToolDeactivate);
            self.previous_tool = Some(current);
        }

        self.active_tool = id;
        if let Some(new_id) = id {
            self.send_to(new_id, &Event::ToolActivate);
            log::info!("Active tool: {}", new_id);
        } else {
            log::info!("No active tool");
        }
        true
    }

    /// Switch back to the previously active tool.
    pub fn switch_to_previous(&mut self) -> bool {
        match self.previous_tool {
            Some(previous) => self.set_active_tool(Some(previous)),
            None => false,
        }
    }

    /// Re-run activation so the active tool's handle follows the selection.
    pub fn selection_changed(&mut self) {
        if let Some(id) = self.active_tool {
            self.send_to(id, &Event::ToolDeactivate);
            self.send_to(id, &Event::ToolActivate);
        }
    }

    /// Route an event. Returns whether it was consumed.
    pub fn event(&mut self, event: &Event) -> bool {
        if let Some(id) = self.active_tool {
            if self.send_to(id, event) {
                return true;
            }
        }

        match *event {
            Event::KeyPress { key, modifiers } => self.handle_shortcut(key, modifiers),
            _ => false,
        }
    }

    fn handle_shortcut(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Char('z') if modifiers.ctrl && modifiers.shift => self.redo(),
            Key::Char('z') if modifiers.ctrl => self.undo(),
            Key::Char('y') if modifiers.ctrl => self.redo(),
            Key::Char('a') if modifiers.ctrl => {
                self.context.selection.select_all(&self.context.scene);
                self.selection_changed();
                true
            }
            Key::Delete => self.delete_selection(),
            Key::Escape => {
                self.context.selection.clear();
                self.selection_changed();
                true
            }
            Key::Char(c) if !modifiers.ctrl => match self.find_by_shortcut(c) {
                Some(id) => {
                    self.set_active_tool(Some(id));
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Undo the last operation. Returns whether anything was undone.
    pub fn undo(&mut self) -> bool {
        match self.context.undo() {
            Ok(undone) => {
                if undone {
                    self.selection_changed();
                }
                undone
            }
            Err(err) => {
                log::error!("Undo failed: {}", err);
                false
            }
        }
    }

    /// Redo the last undone operation. Returns whether anything was redone.
    pub fn redo(&mut self) -> bool {
        match self.context.redo() {
            Ok(redone) => {
                if redone {
                    self.selection_changed();
                }
                redone
            }
            Err(err) => {
                log::error!("Redo failed: {}", err);
                false
            }
        }
    }

    /// Remove every selected node as one undoable operation.
    ///
    /// Nodes whose ancestor is also selected go with that ancestor.
    pub fn delete_selection(&mut self) -> bool {
        let selected = self.context.selection.all_selected();
        let scene = &self.context.scene;
        let top_level: Vec<NodeId> = selected
            .iter()
            .copied()
            .filter(|&id| scene.contains(id))
            .filter(|&id| {
                !selected
                    .iter()
                    .any(|&other| other != id && scene.is_ancestor(other, id))
            })
            .collect();
        if top_level.is_empty() {
            return false;
        }

        let children: Vec<Box<dyn Operation>> = top_level
            .into_iter()
            .map(|id| Box::new(RemoveSceneNodeOperation::new(id)) as Box<dyn Operation>)
            .collect();
        let count = children.len();
        let group = GroupedOperation::with_children("Delete", children);

        match self.context.push_operation(Box::new(group)) {
            Ok(()) => {
                log::info!("Deleted {} node(s)", count);
                self.selection_changed();
                true
            }
            Err(err) => {
                log::error!("Delete failed: {}", err);
                false
            }
        }
    }
}
