use crate::{AssetPath, HashMap};

/**
 * A method of receiving the bytes of tileset files.
 * IE: file, raw, etc.
 */
pub trait Protocol: Send + Sync + 'static {
    /**
     * Name of the protocol, matched against the prefix of an [`AssetPath`].
     * Should not change across invocations.
     */
    fn name(&self) -> &str;
    /**
     * Retrieves raw bytes from the path specified.
     */
    fn read(&self, path: &AssetPath) -> anyhow::Result<Vec<u8>>;
}

/**
 * An implementation of [`Protocol`] that fetches bytes from the file system.
 */
#[derive(Copy, Clone, Debug)]
pub struct FileProtocol;
impl Protocol for FileProtocol {
    fn name(&self) -> &str { "file" }
    fn read(&self, path: &AssetPath) -> anyhow::Result<Vec<u8>> {
        let file_path = path.without_protocol();
        log::debug!("Reading {file_path}");
        let bytes = std::fs::read(&file_path)
            .map_err(|err| anyhow::anyhow!("Failed to read '{file_path}': {err}"))?;
        Ok(bytes)
    }
}

/**
 * An implementation of [`Protocol`] serving files held in memory, keyed by path without protocol.
 * Useful for testing purposes.
 */
#[derive(Clone, Default, Debug)]
pub struct RawProtocol {
    files: HashMap<String, &'static [u8]>,
}

impl RawProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: &'static str) -> Self {
        self.files.insert(path.into(), contents.as_bytes());
        self
    }
}

impl Protocol for RawProtocol {
    fn name(&self) -> &str { "raw" }
    fn read(&self, path: &AssetPath) -> anyhow::Result<Vec<u8>> {
        let key = path.without_protocol();
        match self.files.get(&key) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => Err(anyhow::anyhow!("No in-memory file at '{key}'")),
        }
    }
}
