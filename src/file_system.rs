use crate::models::FileNode;
use log::{debug, warn};
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs as tokio_fs;

/// Directories first, then files; case-insensitive by name within each group.
pub fn compare_nodes(a: &FileNode, b: &FileNode) -> Ordering {
    match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

fn node_from_entry(entry: &fs::DirEntry, base: &Path) -> io::Result<FileNode> {
    let path = entry.path();
    let file_type = entry.file_type()?;
    let relative_path = path
        .strip_prefix(base)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| entry.file_name().to_string_lossy().to_string());

    Ok(FileNode {
        name: entry.file_name().to_string_lossy().to_string(),
        path: path.to_string_lossy().to_string(),
        relative_path,
        is_directory: file_type.is_dir(),
        is_file: file_type.is_file(),
        children: None,
    })
}

/// One level of `path`, sorted. OS errors propagate unchanged.
pub async fn list_directory(path: &str) -> io::Result<Vec<FileNode>> {
    let dir = PathBuf::from(path);
    let mut read_dir = tokio_fs::read_dir(&dir).await?;
    let mut nodes = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let file_type = entry.file_type().await?;
        let name = entry.file_name().to_string_lossy().to_string();
        nodes.push(FileNode {
            relative_path: name.clone(),
            name,
            path: entry.path().to_string_lossy().to_string(),
            is_directory: file_type.is_dir(),
            is_file: file_type.is_file(),
            children: None,
        });
    }

    nodes.sort_by(compare_nodes);
    debug!("Listed {} entries in {}", nodes.len(), dir.display());
    Ok(nodes)
}

fn try_read_tree(dir: &Path, base: &Path) -> io::Result<Vec<FileNode>> {
    let mut nodes = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let mut node = node_from_entry(&entry, base)?;
        if node.is_directory {
            node.children = Some(read_directory_tree_from(&entry.path(), base));
        }
        nodes.push(node);
    }
    nodes.sort_by(compare_nodes);
    Ok(nodes)
}

fn read_directory_tree_from(dir: &Path, base: &Path) -> Vec<FileNode> {
    match try_read_tree(dir, base) {
        Ok(nodes) => nodes,
        Err(e) => {
            // The renderer only sees an empty listing here; the log keeps the cause.
            warn!("Failed to read directory tree at '{}': {}", dir.display(), e);
            Vec::new()
        }
    }
}

/// Recursive listing rooted at `path`. Any directory that cannot be read
/// contributes an empty list instead of failing the whole call.
pub fn read_directory_tree(path: &Path) -> Vec<FileNode> {
    debug!("Building file tree for directory: {}", path.display());
    read_directory_tree_from(path, path)
}

pub async fn read_file(path: &str) -> io::Result<String> {
    tokio_fs::read_to_string(path).await
}

pub async fn read_file_binary(path: &str) -> io::Result<Vec<u8>> {
    tokio_fs::read(path).await
}

pub async fn write_file(path: &str, content: &str) -> io::Result<()> {
    tokio_fs::write(path, content.as_bytes()).await
}

/// Never fails: anything that prevents a stat counts as absent.
pub async fn exists(path: &str) -> bool {
    tokio_fs::metadata(path).await.is_ok()
}

pub async fn directory_exists(path: &str) -> bool {
    tokio_fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

pub async fn create_directory(path: &str) -> io::Result<()> {
    tokio_fs::create_dir(path).await
}

pub async fn delete_file(path: &str) -> io::Result<()> {
    tokio_fs::remove_file(path).await
}

/// Recursive delete; a missing target is not an error.
pub async fn delete_directory(path: &str) -> io::Result<()> {
    let metadata = match tokio_fs::symlink_metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    let result = if metadata.is_dir() {
        tokio_fs::remove_dir_all(path).await
    } else {
        tokio_fs::remove_file(path).await
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

pub async fn rename_item(old_path: &str, new_path: &str) -> io::Result<()> {
    tokio_fs::rename(old_path, new_path).await
}

pub fn home_directory() -> Option<PathBuf> {
    dirs::home_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(nodes: &[FileNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    fn assert_sorted(nodes: &[FileNode]) {
        for pair in nodes.windows(2) {
            assert_ne!(
                compare_nodes(&pair[0], &pair[1]),
                Ordering::Greater,
                "{} should not sort after {}",
                pair[0].name,
                pair[1].name
            );
        }
        for node in nodes {
            if let Some(children) = &node.children {
                assert_sorted(children);
            }
        }
    }

    fn scratch() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("create tempdir");
        fs::write(dir.path().join("b.txt"), "b").expect("write b");
        fs::write(dir.path().join("A.txt"), "a").expect("write A");
        fs::create_dir(dir.path().join("zeta")).expect("mkdir zeta");
        fs::create_dir(dir.path().join("Alpha")).expect("mkdir Alpha");
        fs::write(dir.path().join("zeta").join("inner.md"), "# hi").expect("write inner");
        dir
    }

    #[actix_rt::test]
    async fn listing_puts_directories_first_case_insensitively() {
        let dir = scratch();
        let nodes = list_directory(dir.path().to_str().unwrap()).await.unwrap();
        assert_eq!(names(&nodes), vec!["Alpha", "zeta", "A.txt", "b.txt"]);
        assert!(nodes.iter().all(|n| n.children.is_none()));
        assert!(nodes[0].is_directory && !nodes[0].is_file);
        assert!(nodes[2].is_file && !nodes[2].is_directory);
    }

    #[actix_rt::test]
    async fn listing_missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = list_directory(missing.to_str().unwrap()).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn tree_expands_subdirectories_with_relative_paths() {
        let dir = scratch();
        let tree = read_directory_tree(dir.path());
        assert_sorted(&tree);

        let zeta = tree.iter().find(|n| n.name == "zeta").unwrap();
        let children = zeta.children.as_ref().unwrap();
        assert_eq!(names(children), vec!["inner.md"]);
        assert_eq!(
            PathBuf::from(&children[0].relative_path),
            PathBuf::from("zeta").join("inner.md")
        );
        assert!(tree.iter().find(|n| n.name == "b.txt").unwrap().children.is_none());
    }

    #[test]
    fn tree_of_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_directory_tree(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn failed_subtree_read_is_empty_and_siblings_survive() {
        let dir = scratch();

        // Reading a regular file as a directory fails regardless of privileges.
        let subtree = read_directory_tree_from(&dir.path().join("b.txt"), dir.path());
        assert!(subtree.is_empty());

        let tree = read_directory_tree(dir.path());
        assert_eq!(names(&tree), vec!["Alpha", "zeta", "A.txt", "b.txt"]);
        let zeta = tree.iter().find(|n| n.name == "zeta").unwrap();
        assert_eq!(names(zeta.children.as_deref().unwrap()), vec!["inner.md"]);
        let alpha = tree.iter().find(|n| n.name == "Alpha").unwrap();
        assert_eq!(alpha.children.as_deref(), Some(&[][..]));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_does_not_hide_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let dir = scratch();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret.txt"), "x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users bypass the permission bits entirely.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let tree = read_directory_tree(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(names(&tree), vec!["Alpha", "locked", "zeta", "A.txt", "b.txt"]);
        let locked_node = tree.iter().find(|n| n.name == "locked").unwrap();
        assert_eq!(locked_node.children.as_deref(), Some(&[][..]));
    }

    #[actix_rt::test]
    async fn write_then_read_preserves_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let path = path.to_str().unwrap();
        let content = "héllo — wörld ✓\nline two\n";

        write_file(path, content).await.unwrap();
        assert_eq!(read_file(path).await.unwrap(), content);
        assert_eq!(read_file_binary(path).await.unwrap(), content.as_bytes());
    }

    #[actix_rt::test]
    async fn existence_checks_never_fail() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "").unwrap();
        let file = file.to_str().unwrap();

        assert!(exists(root).await);
        assert!(exists(file).await);
        assert!(directory_exists(root).await);
        assert!(!directory_exists(file).await);
        assert!(!exists("/definitely/not/here").await);
        assert!(!directory_exists("").await);
    }

    #[actix_rt::test]
    async fn create_directory_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let err = create_directory(nested.to_str().unwrap()).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let single = dir.path().join("a");
        create_directory(single.to_str().unwrap()).await.unwrap();
        let again = create_directory(single.to_str().unwrap()).await.unwrap_err();
        assert_eq!(again.kind(), io::ErrorKind::AlreadyExists);
    }

    #[actix_rt::test]
    async fn delete_directory_is_recursive_and_tolerant() {
        let dir = scratch();
        let zeta = dir.path().join("zeta");
        delete_directory(zeta.to_str().unwrap()).await.unwrap();
        assert!(!zeta.exists());
        delete_directory(zeta.to_str().unwrap()).await.unwrap();
    }

    #[actix_rt::test]
    async fn rename_moves_entries() {
        let dir = scratch();
        let from = dir.path().join("b.txt");
        let to = dir.path().join("renamed.txt");
        rename_item(from.to_str().unwrap(), to.to_str().unwrap()).await.unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "b");

        delete_file(to.to_str().unwrap()).await.unwrap();
        assert!(!to.exists());
    }
}
