//! Background mesh reading.

use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use lathe_scene::{NodeId, SceneNode};

use super::{MeshError, MeshFileHandler};
use crate::context::SceneContext;
use crate::operations::AddSceneNodeOperation;

/// Result of a finished [`ReadMeshJob`].
#[derive(Debug)]
pub struct JobFinished {
    pub file_name: PathBuf,
    pub result: Result<SceneNode, MeshError>,
}

/// Reads one mesh file off the main thread.
///
/// The job only decodes. The scene is modified on the main thread once the
/// [`JobFinished`] message is received.
pub struct ReadMeshJob {
    file_name: PathBuf,
}

impl ReadMeshJob {
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Decode on a new thread and report on `done`.
    pub fn start(self, handler: MeshFileHandler, done: Sender<JobFinished>) -> JoinHandle<()> {
        thread::spawn(move || {
            let result = self.run(&handler);
            if done
                .send(JobFinished {
                    file_name: self.file_name,
                    result,
                })
                .is_err()
            {
                log::debug!("Mesh loader dropped before read finished");
            }
        })
    }

    fn run(&self, handler: &MeshFileHandler) -> Result<SceneNode, MeshError> {
        let mesh = handler.read(&self.file_name)?;
        log::debug!(
            "Read {:?}: {} vertices, {} faces",
            self.file_name,
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(SceneNode::new(base_name(&self.file_name)).with_mesh(mesh))
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Starts read jobs and inserts their results into the scene.
pub struct MeshLoader {
    handler: MeshFileHandler,
    tx: Sender<JobFinished>,
    rx: Receiver<JobFinished>,
    pending: usize,
}

impl MeshLoader {
    pub fn new(handler: MeshFileHandler) -> Self {
        let (tx, rx) = unbounded();
        Self {
            handler,
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn handler(&self) -> &MeshFileHandler {
        &self.handler
    }

    /// Jobs started but not yet processed
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start reading `path` in the background. An empty path is ignored.
    pub fn read_local_file(&mut self, path: impl AsRef<Path>) -> Option<JoinHandle<()>> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return None;
        }
        log::info!("Loading mesh {:?}", path);
        self.pending += 1;
        Some(ReadMeshJob::new(path).start(self.handler.clone(), self.tx.clone()))
    }

    /// Insert every finished mesh into the scene without blocking.
    /// Returns the ids of the added nodes.
    pub fn process_finished(&mut self, ctx: &mut SceneContext) -> Vec<NodeId> {
        let mut added = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(finished) => {
                    if let Some(id) = self.finish(finished, ctx) {
                        added.push(id);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        added
    }

    /// Block until every started job has finished or `timeout` elapses,
    /// inserting results as they arrive.
    pub fn wait_finished(&mut self, ctx: &mut SceneContext, timeout: Duration) -> Vec<NodeId> {
        let deadline = Instant::now() + timeout;
        let mut added = Vec::new();
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(finished) => {
                    if let Some(id) = self.finish(finished, ctx) {
                        added.push(id);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!("{} mesh read(s) still running", self.pending);
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        added
    }

    fn finish(&mut self, finished: JobFinished, ctx: &mut SceneContext) -> Option<NodeId> {
        self.pending = self.pending.saturating_sub(1);
        let JobFinished { file_name, result } = finished;

        let mut node = match result {
            Ok(node) => node,
            Err(err) => {
                log::error!("Failed to load {:?}: {}", file_name, err);
                return None;
            }
        };
        node.selectable = true;
        node.name = base_name(&file_name);

        let root = ctx.scene.root();
        let op = AddSceneNodeOperation::new(node, root);
        let id = op.node();
        match ctx.push_operation(Box::new(op)) {
            Ok(()) => {
                ctx.preferences.add_recent_file(&file_name);
                log::info!("Loaded {:?} as {}", file_name, id);
                Some(id)
            }
            Err(err) => {
                log::error!("Failed to add {:?} to the scene: {}", file_name, err);
                None
            }
        }
    }
}
