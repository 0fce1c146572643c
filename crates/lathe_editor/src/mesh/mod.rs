//! Mesh file handling.
//!
//! Format parsing is supplied by [`MeshReader`]/[`MeshWriter`]
//! implementations registered with a [`MeshFileHandler`]. Reading happens on
//! a background thread; the finished node is handed back over a channel and
//! inserted into the scene on the main thread by [`MeshLoader`].

mod error;
mod file_handler;
mod read_job;

pub use error::MeshError;
pub use file_handler::{MeshFileHandler, MeshReader, MeshWriter};
pub use read_job::{JobFinished, MeshLoader, ReadMeshJob};
