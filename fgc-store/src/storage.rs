use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const APP_DIR: &str = "fgc";
const CONFIG_FILE_NAME: &str = "presets.json";

/// Durable location a config document is read from and written to.
pub trait ConfigStorage {
    /// Raw document bytes, or `None` when nothing has been stored yet.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the stored document. Either the whole payload lands or the
    /// previous document stays intact.
    fn write(&self, payload: &[u8]) -> io::Result<()>;

    /// Human-readable location used in log lines.
    fn describe(&self) -> String;
}

/// Config file on disk, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at [`default_config_path`].
    pub fn at_default_location() -> Self {
        Self::new(default_config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStorage for FileStorage {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, payload: &[u8]) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        write_atomic(&self.path, payload)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    payload: Option<Vec<u8>>,
    writes: usize,
    fail_writes: bool,
}

/// In-memory storage. Clones share the same document, so a caller can keep
/// a handle to observe what a store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<Vec<u8>>) -> Self {
        let storage = Self::default();
        storage.state.borrow_mut().payload = Some(payload.into());
        storage
    }

    pub fn payload(&self) -> Option<Vec<u8>> {
        self.state.borrow().payload.clone()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }

    /// Make subsequent writes fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl ConfigStorage for MemoryStorage {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.state.borrow().payload.clone())
    }

    fn write(&self, payload: &[u8]) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(io::Error::other("memory storage rejects writes"));
        }
        state.payload = Some(payload.to_vec());
        state.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        String::from("<memory>")
    }
}

/// `$HOME/.config/fgc/presets.json`, or the temp dir when `HOME` is unset.
pub fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return Path::new(&home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE_NAME);
    }

    std::env::temp_dir().join(APP_DIR).join(CONFIG_FILE_NAME)
}

pub(crate) fn write_atomic(path: &Path, payload: &[u8]) -> io::Result<()> {
    let tmp_path = path.with_extension(tmp_extension(path));
    fs::write(&tmp_path, payload)?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}

fn tmp_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!("{}.tmp", ext.to_string_lossy()),
        None => String::from("tmp"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{ConfigStorage, FileStorage, MemoryStorage, write_atomic};

    pub(crate) struct TempDirGuard {
        path: PathBuf,
    }

    impl TempDirGuard {
        pub(crate) fn new(test_name: &str) -> Self {
            let stamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system time should be after epoch")
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "fgc-{test_name}-{}-{stamp}",
                std::process::id(),
            ));
            fs::create_dir_all(&path).expect("failed to create temporary dir");
            Self { path }
        }

        pub(crate) fn path(&self) -> &PathBuf {
            &self.path
        }

        pub(crate) fn file_path(&self) -> PathBuf {
            self.path.join("presets.json")
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn given_missing_file_when_reading_then_returns_none() {
        let temp_dir = TempDirGuard::new("storage-missing");
        let storage = FileStorage::new(temp_dir.file_path());

        let data = storage.read().expect("read should not fail");

        assert!(data.is_none());
    }

    #[test]
    fn given_nested_path_when_writing_then_creates_dirs_and_leaves_no_tmp() {
        let temp_dir = TempDirGuard::new("storage-nested");
        let path = temp_dir.path().join("a").join("b").join("presets.json");
        let storage = FileStorage::new(&path);

        storage.write(b"{}").expect("write should succeed");
        storage.write(b"{\"v\":2}").expect("second write should succeed");

        assert_eq!(
            storage.read().expect("read").as_deref(),
            Some(&b"{\"v\":2}"[..])
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn given_rename_failure_when_writing_then_tmp_file_is_removed() {
        let temp_dir = TempDirGuard::new("storage-rename");
        let path = temp_dir.file_path();
        fs::create_dir_all(path.join("occupied"))
            .expect("directory should take the target path");

        assert!(write_atomic(&path, b"{}").is_err());
        assert!(path.is_dir());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn given_memory_storage_when_cloned_then_handles_share_document() {
        let storage = MemoryStorage::new();
        let observer = storage.clone();

        storage.write(b"one").expect("write");
        storage.write(b"two").expect("write");

        assert_eq!(observer.writes(), 2);
        assert_eq!(observer.payload().as_deref(), Some(&b"two"[..]));
    }

    #[test]
    fn given_failing_memory_storage_when_writing_then_keeps_old_payload() {
        let storage = MemoryStorage::with_payload("old");
        storage.set_fail_writes(true);

        assert!(storage.write(b"new").is_err());
        assert_eq!(storage.payload().as_deref(), Some(&b"old"[..]));
        assert_eq!(storage.writes(), 0);
    }
}
