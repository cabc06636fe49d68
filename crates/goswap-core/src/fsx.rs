use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An immediate entry of an [`Fsx`] root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Capability over a single directory root.
///
/// Names are relative to the root; anything that would escape it (absolute
/// paths, `..`) is rejected with [`io::ErrorKind::InvalidInput`].
pub trait Fsx: Send + Sync {
    /// Target of the symlink `name`.
    fn read_link(&self, name: &str) -> io::Result<PathBuf>;

    /// Create `name` pointing at `target`, replacing any existing entry
    /// atomically.
    fn symlink(&self, target: &str, name: &str) -> io::Result<()>;

    /// Remove a single entry. A missing entry reports
    /// [`io::ErrorKind::NotFound`].
    fn remove(&self, name: &str) -> io::Result<()>;

    /// Remove an entry and everything below it. A missing entry is not an
    /// error.
    fn remove_all(&self, name: &str) -> io::Result<()>;

    /// Immediate entries of the root. Symlinks are reported as non-directories.
    fn read_dir(&self) -> io::Result<Vec<DirEntry>>;

    fn exists(&self, path: &str) -> io::Result<bool>;
}

impl<T: Fsx + ?Sized> Fsx for Arc<T> {
    fn read_link(&self, name: &str) -> io::Result<PathBuf> {
        (**self).read_link(name)
    }

    fn symlink(&self, target: &str, name: &str) -> io::Result<()> {
        (**self).symlink(target, name)
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        (**self).remove(name)
    }

    fn remove_all(&self, name: &str) -> io::Result<()> {
        (**self).remove_all(name)
    }

    fn read_dir(&self) -> io::Result<Vec<DirEntry>> {
        (**self).read_dir()
    }

    fn exists(&self, path: &str) -> io::Result<bool> {
        (**self).exists(path)
    }
}

fn check_relative(name: &str) -> io::Result<&Path> {
    let path = Path::new(name);
    let escapes = name.is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name:?} is not a name inside the root"),
        ));
    }
    Ok(path)
}

/// [`Fsx`] backed by a real directory.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, name: &str) -> io::Result<PathBuf> {
        check_relative(name).map(|relative| self.root.join(relative))
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

impl Fsx for DirFs {
    fn read_link(&self, name: &str) -> io::Result<PathBuf> {
        std::fs::read_link(self.path(name)?)
    }

    fn symlink(&self, target: &str, name: &str) -> io::Result<()> {
        let link = self.path(name)?;
        let staging = self.path(&format!(".{name}.tmp-{}", std::process::id()))?;

        match std::fs::remove_file(&staging) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
            _ => {}
        }

        create_symlink(Path::new(target), &staging)?;
        if let Err(err) = std::fs::rename(&staging, &link) {
            let _ = std::fs::remove_file(&staging);
            return Err(err);
        }

        log::debug!("Linked {} -> {target}", link.display());
        Ok(())
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        let path = self.path(name)?;
        if std::fs::symlink_metadata(&path)?.is_dir() {
            std::fs::remove_dir(&path)
        } else {
            std::fs::remove_file(&path)
        }
    }

    fn remove_all(&self, name: &str) -> io::Result<()> {
        let path = self.path(name)?;
        let result = match std::fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&path),
            Ok(_) => std::fs::remove_file(&path),
            Err(err) => Err(err),
        };

        match result {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn read_dir(&self) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn exists(&self, path: &str) -> io::Result<bool> {
        match std::fs::metadata(self.path(path)?) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    File,
    Dir,
    Symlink(String),
}

/// In-memory [`Fsx`] used to drive the engine without touching disk.
#[derive(Debug, Default)]
pub struct MemFs {
    nodes: Mutex<BTreeMap<String, Node>>,
}

impl MemFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(self, path: &str) -> Self {
        self.insert(path, Node::File);
        self
    }

    #[must_use]
    pub fn with_dir(self, path: &str) -> Self {
        self.insert(path, Node::Dir);
        self
    }

    #[must_use]
    pub fn with_symlink(self, target: &str, name: &str) -> Self {
        self.insert(name, Node::Symlink(target.to_string()));
        self
    }

    /// Create an empty file, along with any missing parent directories.
    pub fn touch(&self, path: &str) {
        self.insert(path, Node::File);
    }

    fn insert(&self, path: &str, node: Node) {
        let key = normalize(path);
        let mut nodes = self.lock();
        if let Some((parents, _)) = key.rsplit_once('/') {
            let mut parent = String::new();
            for segment in parents.split('/') {
                if !parent.is_empty() {
                    parent.push('/');
                }
                parent.push_str(segment);
                nodes.entry(parent.clone()).or_insert(Node::Dir);
            }
        }
        nodes.insert(key, node);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn not_found(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{name}: no such entry"))
}

impl Fsx for MemFs {
    fn read_link(&self, name: &str) -> io::Result<PathBuf> {
        check_relative(name)?;
        match self.lock().get(&normalize(name)) {
            Some(Node::Symlink(target)) => Ok(PathBuf::from(target)),
            Some(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{name}: not a symlink"),
            )),
            None => Err(not_found(name)),
        }
    }

    fn symlink(&self, target: &str, name: &str) -> io::Result<()> {
        check_relative(name)?;
        let key = normalize(name);
        let is_dir = matches!(self.lock().get(&key), Some(Node::Dir));
        if is_dir {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{name}: is a directory"),
            ));
        }
        self.insert(&key, Node::Symlink(target.to_string()));
        Ok(())
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        check_relative(name)?;
        let key = normalize(name);
        let prefix = format!("{key}/");
        let mut nodes = self.lock();
        let has_children = nodes.keys().any(|k| k.starts_with(&prefix));
        match nodes.get(&key).cloned() {
            None => Err(not_found(name)),
            Some(Node::Dir) if has_children => Err(io::Error::new(
                io::ErrorKind::DirectoryNotEmpty,
                format!("{name}: directory not empty"),
            )),
            Some(_) => {
                nodes.remove(&key);
                Ok(())
            }
        }
    }

    fn remove_all(&self, name: &str) -> io::Result<()> {
        check_relative(name)?;
        let key = normalize(name);
        let prefix = format!("{key}/");
        self.lock().retain(|k, _| *k != key && !k.starts_with(&prefix));
        Ok(())
    }

    fn read_dir(&self) -> io::Result<Vec<DirEntry>> {
        Ok(self
            .lock()
            .iter()
            .filter(|(key, _)| !key.contains('/'))
            .map(|(key, node)| DirEntry {
                name: key.clone(),
                is_dir: *node == Node::Dir,
            })
            .collect())
    }

    fn exists(&self, path: &str) -> io::Result<bool> {
        check_relative(path)?;
        Ok(self.lock().contains_key(&normalize(path)))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use super::{DirEntry, DirFs, Fsx, MemFs};

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn dir_fs_symlink_replaces_existing_link() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(temp_dir.path().join("go1.20"), "").expect("write binary");
        std::fs::write(temp_dir.path().join("go1.21"), "").expect("write binary");
        let fs = DirFs::new(temp_dir.path());

        fs.symlink("go1.20", "go").expect("first link");
        fs.symlink("go1.21", "go").expect("replace link");

        assert_eq!(fs.read_link("go").expect("read link"), PathBuf::from("go1.21"));
        let entries = fs.read_dir().expect("read dir");
        assert_eq!(names(&entries), ["go", "go1.20", "go1.21"]);
    }

    #[test]
    fn dir_fs_remove_reports_not_found() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let fs = DirFs::new(temp_dir.path());

        let err = fs.remove("go").expect_err("nothing to remove");

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn dir_fs_remove_all_deletes_tree_and_tolerates_missing() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let sdk = temp_dir.path().join("go1.21");
        std::fs::create_dir_all(sdk.join("bin")).expect("create sdk tree");
        std::fs::write(sdk.join(".unpacked-success"), "").expect("write sentinel");
        let fs = DirFs::new(temp_dir.path());

        fs.remove_all("go1.21").expect("remove tree");
        fs.remove_all("go1.21").expect("second removal is a no-op");

        assert!(!sdk.exists());
    }

    #[test]
    fn dir_fs_read_dir_flags_directories() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(temp_dir.path().join("pkg")).expect("create dir");
        std::fs::write(temp_dir.path().join("go1.21"), "").expect("write binary");
        let fs = DirFs::new(temp_dir.path());

        let entries = fs.read_dir().expect("read dir");

        assert_eq!(
            entries,
            vec![
                DirEntry {
                    name: "go1.21".to_string(),
                    is_dir: false
                },
                DirEntry {
                    name: "pkg".to_string(),
                    is_dir: true
                },
            ]
        );
    }

    #[test]
    fn dir_fs_rejects_names_outside_root() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let fs = DirFs::new(temp_dir.path().join("bin"));

        for name in ["../escape", "/etc/passwd", ""] {
            let err = fs.remove(name).expect_err("escaping name must be rejected");
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{name:?}");
        }
    }

    #[test]
    fn dir_fs_exists_checks_nested_paths() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(temp_dir.path().join("go1.21")).expect("create dir");
        let fs = DirFs::new(temp_dir.path());

        assert!(!fs.exists("go1.21/.unpacked-success").expect("stat"));
        std::fs::write(temp_dir.path().join("go1.21/.unpacked-success"), "").expect("touch");
        assert!(fs.exists("go1.21/.unpacked-success").expect("stat"));
    }

    #[test]
    fn mem_fs_lists_only_top_level_entries() {
        let fs = MemFs::new()
            .with_file("go1.20")
            .with_file("sub/go1.19")
            .with_symlink("go1.20", "go");

        let entries = fs.read_dir().expect("read dir");

        assert_eq!(names(&entries), ["go", "go1.20", "sub"]);
        assert!(entries.iter().any(|e| e.name == "sub" && e.is_dir));
        assert!(entries.iter().any(|e| e.name == "go" && !e.is_dir));
    }

    #[test]
    fn mem_fs_symlink_round_trip_and_removal() {
        let fs = MemFs::new();

        assert_eq!(
            fs.read_link("go").expect_err("no link yet").kind(),
            io::ErrorKind::NotFound
        );
        fs.symlink("go1.21", "go").expect("create link");
        assert_eq!(fs.read_link("go").expect("read link"), PathBuf::from("go1.21"));
        fs.remove("go").expect("remove link");
        assert_eq!(
            fs.remove("go").expect_err("already gone").kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn mem_fs_remove_all_drops_subtree() {
        let fs = MemFs::new()
            .with_file("go1.21/.unpacked-success")
            .with_file("go1.21/bin/go")
            .with_file("go1.22/.unpacked-success");

        fs.remove_all("go1.21").expect("remove subtree");

        assert!(!fs.exists("go1.21").unwrap());
        assert!(!fs.exists("go1.21/bin/go").unwrap());
        assert!(fs.exists("go1.22/.unpacked-success").unwrap());
    }

    #[test]
    fn mem_fs_remove_refuses_non_empty_dir() {
        let fs = MemFs::new()
            .with_dir("pkg")
            .with_file("go1.21/.unpacked-success");

        let err = fs.remove("go1.21").expect_err("directory has children");

        assert_eq!(err.kind(), io::ErrorKind::DirectoryNotEmpty);
        fs.remove("pkg").expect("empty directory can be removed");
    }
}
