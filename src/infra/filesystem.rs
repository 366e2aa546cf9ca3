//! Filesystem operations
//!
//! Path resolution, directory creation, symlinks and the scoped working
//! directory used to run external commands.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};

use walkdir::WalkDir;

use crate::error::FilesystemError;

/// Expand `~` and `$VAR`/`${VAR}` in `input`, then make it absolute against
/// the process working directory and normalize it lexically.
///
/// Unset variables are kept verbatim, as is a `$` that does not start a
/// variable reference (`$$HOME` keeps the first `$` and expands `$HOME`).
/// This never fails: a malformed input still yields a well-formed absolute
/// path.
pub fn resolve_path(input: &str) -> PathBuf {
    resolve_path_from(input, &process_directory())
}

/// Same as [`resolve_path`], resolving relative results against `base`.
pub fn resolve_path_from(input: &str, base: &Path) -> PathBuf {
    absolutize(Path::new(&expand(input)), base)
}

fn process_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(MAIN_SEPARATOR_STR))
}

fn expand(input: &str) -> String {
    shellexpand::full_with_context_no_errors(
        &escape_repeated_sigils(input),
        || dirs::home_dir().map(|home| home.to_string_lossy().into_owned()),
        |name| std::env::var(name).ok(),
    )
    .into_owned()
}

/// shellexpand reads `$$` as an escaped `$`. A `$` followed by another `$`
/// is literal here, so it is escaped and the second `$` still expands.
fn escape_repeated_sigils(input: &str) -> Cow<'_, str> {
    if !input.contains("$$") {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len() + 4);
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        escaped.push(c);
        if c == '$' && chars.peek() == Some(&'$') {
            escaped.push('$');
        }
    }
    Cow::Owned(escaped)
}

/// Join `path` onto `base` unless already absolute, then normalize.
/// No expansion is done, so non-UTF-8 paths pass through untouched.
fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Lexically remove `.` and `..` components. `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Create a directory and its parents if missing; return its absolute path
pub fn ensure_directory(path: &Path) -> Result<PathBuf, FilesystemError> {
    let absolute = absolutize(path, &process_directory());
    if !absolute.exists() {
        std::fs::create_dir_all(&absolute).map_err(|e| FilesystemError::CreateDir {
            path: absolute.clone(),
            error: e.to_string(),
        })?;
    }
    Ok(absolute)
}

/// Create a symbolic link at `link` pointing to `target`
///
/// Fails if `link` already exists. A missing `target` yields a dangling link.
pub fn symlink(target: &Path, link: &Path) -> Result<(), FilesystemError> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);
    #[cfg(windows)]
    let result = std::os::windows::fs::symlink_file(target, link);

    result.map_err(|e| FilesystemError::Symlink {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        error: e.to_string(),
    })
}

/// Base names of the files in `dir` (not recursive) with the given extension
pub fn file_stems_with_extension(
    dir: &Path,
    extension: &str,
) -> Result<BTreeSet<String>, FilesystemError> {
    let mut stems = BTreeSet::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| FilesystemError::ReadDir {
            path: dir.to_path_buf(),
            error: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.starts_with('.') => {
                stems.insert(stem.to_string());
            }
            _ => {}
        }
    }
    Ok(stems)
}

/// Logical working directory
///
/// Holds a stack of directories instead of mutating the process-wide current
/// directory. [`WorkingDirectory::enter`] pushes a directory and returns a
/// guard that pops it again when dropped, on every exit path including `?`
/// and unwinding. Guards deref to the `WorkingDirectory`, so scopes nest.
#[derive(Debug, Clone)]
pub struct WorkingDirectory {
    stack: Vec<PathBuf>,
}

impl WorkingDirectory {
    /// Start at `root` (resolved to an absolute path)
    pub fn new(root: &Path) -> Self {
        Self {
            stack: vec![absolutize(root, &process_directory())],
        }
    }

    /// The innermost directory
    pub fn current(&self) -> &Path {
        // The root entry is never popped.
        &self.stack[self.stack.len() - 1]
    }

    /// Number of open scopes (0 at the root)
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Resolve `path` against the innermost directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        absolutize(path, self.current())
    }

    /// Enter `path` for the lifetime of the returned guard
    ///
    /// With `create`, the directory is created first; otherwise it must exist.
    pub fn enter(&mut self, path: &Path, create: bool) -> Result<ScopedDirectory<'_>, FilesystemError> {
        let target = self.resolve(path);
        if create {
            ensure_directory(&target)?;
        } else if !target.is_dir() {
            return Err(FilesystemError::NotADirectory { path: target });
        }
        tracing::debug!("Entering {}", target.display());
        self.stack.push(target);
        Ok(ScopedDirectory { owner: self })
    }
}

/// Guard returned by [`WorkingDirectory::enter`]
#[derive(Debug)]
pub struct ScopedDirectory<'a> {
    owner: &'a mut WorkingDirectory,
}

impl Deref for ScopedDirectory<'_> {
    type Target = WorkingDirectory;

    fn deref(&self) -> &WorkingDirectory {
        self.owner
    }
}

impl DerefMut for ScopedDirectory<'_> {
    fn deref_mut(&mut self) -> &mut WorkingDirectory {
        self.owner
    }
}

impl Drop for ScopedDirectory<'_> {
    fn drop(&mut self) {
        if self.owner.stack.len() > 1 {
            self.owner.stack.pop();
        }
    }
}
