//! Registry of mesh readers and writers.

use std::path::Path;
use std::sync::Arc;

use lathe_scene::MeshData;

use super::MeshError;

/// Decodes one mesh file format.
pub trait MeshReader: Send + Sync {
    /// File extension without the dot, lowercase
    fn extension(&self) -> &str;

    /// Human-readable format name
    fn description(&self) -> &str;

    fn read(&self, path: &Path) -> Result<MeshData, MeshError>;
}

/// Encodes one mesh file format.
pub trait MeshWriter: Send + Sync {
    /// File extension without the dot, lowercase
    fn extension(&self) -> &str;

    /// Human-readable format name
    fn description(&self) -> &str;

    fn write(&self, path: &Path, mesh: &MeshData) -> Result<(), MeshError>;
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Readers and writers by file extension.
#[derive(Default, Clone)]
pub struct MeshFileHandler {
    readers: Vec<Arc<dyn MeshReader>>,
    writers: Vec<Arc<dyn MeshWriter>>,
}

impl MeshFileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reader. A later reader for the same extension wins.
    pub fn add_reader(&mut self, reader: Arc<dyn MeshReader>) {
        self.readers.retain(|r| r.extension() != reader.extension());
        self.readers.push(reader);
    }

    /// Register a writer. A later writer for the same extension wins.
    pub fn add_writer(&mut self, writer: Arc<dyn MeshWriter>) {
        self.writers.retain(|w| w.extension() != writer.extension());
        self.writers.push(writer);
    }

    pub fn reader_for(&self, path: &Path) -> Option<&Arc<dyn MeshReader>> {
        let ext = extension_of(path)?;
        self.readers.iter().find(|r| r.extension() == ext)
    }

    pub fn writer_for(&self, path: &Path) -> Option<&Arc<dyn MeshWriter>> {
        let ext = extension_of(path)?;
        self.writers.iter().find(|w| w.extension() == ext)
    }

    pub fn read(&self, path: &Path) -> Result<MeshData, MeshError> {
        let reader = self
            .reader_for(path)
            .ok_or_else(|| MeshError::UnsupportedFormat(path.to_path_buf()))?;
        reader.read(path)
    }

    pub fn write(&self, path: &Path, mesh: &MeshData) -> Result<(), MeshError> {
        let writer = self
            .writer_for(path)
            .ok_or_else(|| MeshError::UnsupportedFormat(path.to_path_buf()))?;
        writer.write(path, mesh)?;
        log::info!("Wrote mesh to {:?}", path);
        Ok(())
    }

    /// File dialog filters for opening: one entry per format sorted, led
    /// by an "All Supported Types" entry and closed by "All Files".
    pub fn supported_read_file_types(&self) -> Vec<String> {
        let mut file_types: Vec<String> = self
            .readers
            .iter()
            .map(|r| format!("{} (*.{})", r.description(), r.extension()))
            .collect();
        file_types.sort();

        let all_types: Vec<String> = self
            .readers
            .iter()
            .map(|r| format!("*.{}", r.extension()))
            .collect();
        file_types.insert(0, format!("All Supported Types ({})", all_types.join(" ")));
        file_types.push("All Files (*)".to_string());
        file_types
    }

    /// File dialog filters for saving, sorted.
    pub fn supported_write_file_types(&self) -> Vec<String> {
        let mut file_types: Vec<String> = self
            .writers
            .iter()
            .map(|w| format!("{} (*.{})", w.description(), w.extension()))
            .collect();
        file_types.sort();
        file_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Format(&'static str, &'static str);

    impl MeshReader for Format {
        fn extension(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        fn read(&self, _path: &Path) -> Result<MeshData, MeshError> {
            Ok(MeshData::default())
        }
    }

    impl MeshWriter for Format {
        fn extension(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        fn write(&self, _path: &Path, _mesh: &MeshData) -> Result<(), MeshError> {
            Ok(())
        }
    }

    #[test]
    fn test_read_file_types() {
        let mut handler = MeshFileHandler::new();
        handler.add_reader(Arc::new(Format("stl", "STL File")));
        handler.add_reader(Arc::new(Format("obj", "Wavefront OBJ")));
        handler.add_reader(Arc::new(Format("amf", "AMF File")));

        assert_eq!(
            handler.supported_read_file_types(),
            vec![
                "All Supported Types (*.stl *.obj *.amf)".to_string(),
                "AMF File (*.amf)".to_string(),
                "STL File (*.stl)".to_string(),
                "Wavefront OBJ (*.obj)".to_string(),
                "All Files (*)".to_string(),
            ]
        );
    }

    #[test]
    fn test_write_file_types_sorted() {
        let mut handler = MeshFileHandler::new();
        handler.add_writer(Arc::new(Format("stl", "STL File")));
        handler.add_writer(Arc::new(Format("3mf", "3MF File")));
        assert_eq!(
            handler.supported_write_file_types(),
            vec!["3MF File (*.3mf)".to_string(), "STL File (*.stl)".to_string()]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut handler = MeshFileHandler::new();
        handler.add_reader(Arc::new(Format("stl", "STL File")));
        assert!(handler.reader_for(Path::new("part.STL")).is_some());
        assert!(matches!(
            handler.read(Path::new("part.ply")),
            Err(MeshError::UnsupportedFormat(_))
        ));
    }
}
