use crate::entry::WalkEntry;
use crate::error::WalkError;
use logging::debug_log;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Pre-order iterator over a directory tree.
///
/// Directory contents are read lazily, just before the first child is
/// needed, which lets [`skip_current_dir`](Self::skip_current_dir) prune a
/// directory without ever listing it.
pub struct Walker {
    root: PathBuf,
    root_metadata: Option<fs::Metadata>,
    pending: Option<PendingDirectory>,
    stack: Vec<DirectoryState>,
    finished: bool,
}

struct PendingDirectory {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    depth: usize,
}

impl Walker {
    pub(crate) fn new(root: PathBuf, include_root: bool) -> Result<Self, WalkError> {
        let root = absolutize(root)?;
        debug_log!(Walk, 1, "walking {}", root.display());

        let metadata = fs::symlink_metadata(&root)
            .map_err(|error| WalkError::root_metadata(root.clone(), error))?;
        let pending = metadata.is_dir().then(|| PendingDirectory {
            fs_path: root.clone(),
            relative_prefix: PathBuf::new(),
            depth: 0,
        });

        let mut walker = Self {
            root,
            root_metadata: include_root.then_some(metadata),
            pending,
            stack: Vec::new(),
            finished: false,
        };
        if !include_root {
            walker.enter_pending()?;
        }
        Ok(walker)
    }

    /// Prevents descent into the directory most recently yielded.
    ///
    /// Has no effect when the last entry was not a directory or when its
    /// children have already started to be produced.
    pub fn skip_current_dir(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug_log!(Walk, 2, "pruning {}", pending.fs_path.display());
        }
    }

    fn enter_pending(&mut self) -> Result<(), WalkError> {
        if let Some(pending) = self.pending.take() {
            debug_log!(Walk, 2, "entering {}", pending.fs_path.display());
            let state = DirectoryState::read(pending)?;
            self.stack.push(state);
        }
        Ok(())
    }

    fn prepare_entry(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<WalkEntry, WalkError> {
        let metadata = fs::symlink_metadata(&full_path)
            .map_err(|error| WalkError::metadata(full_path.clone(), error))?;

        if metadata.is_dir() {
            self.pending = Some(PendingDirectory {
                fs_path: full_path.clone(),
                relative_prefix: relative_path.clone(),
                depth,
            });
        }

        Ok(WalkEntry {
            full_path,
            relative_path,
            metadata,
            depth,
            is_root: false,
        })
    }

    fn fail(&mut self, error: WalkError) -> Option<Result<WalkEntry, WalkError>> {
        self.finished = true;
        self.pending = None;
        self.stack.clear();
        Some(Err(error))
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(metadata) = self.root_metadata.take() {
            return Some(Ok(WalkEntry {
                full_path: self.root.clone(),
                relative_path: PathBuf::new(),
                metadata,
                depth: 0,
                is_root: true,
            }));
        }

        if let Err(error) = self.enter_pending() {
            return self.fail(error);
        }

        loop {
            let state = self.stack.last_mut()?;
            let Some(name) = state.next_name() else {
                self.stack.pop();
                continue;
            };
            let full_path = state.fs_path.join(&name);
            let relative_path = state.relative_prefix.join(&name);
            let depth = state.depth + 1;

            return match self.prepare_entry(full_path, relative_path, depth) {
                Ok(entry) => Some(Ok(entry)),
                Err(error) => self.fail(error),
            };
        }
    }
}

struct DirectoryState {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    entries: std::vec::IntoIter<OsString>,
    depth: usize,
}

impl DirectoryState {
    fn read(pending: PendingDirectory) -> Result<Self, WalkError> {
        let PendingDirectory {
            fs_path,
            relative_prefix,
            depth,
        } = pending;

        let mut names = Vec::new();
        let read_dir =
            fs::read_dir(&fs_path).map_err(|error| WalkError::read_dir(fs_path.clone(), error))?;
        for entry in read_dir {
            let entry = entry.map_err(|error| WalkError::read_dir_entry(fs_path.clone(), error))?;
            names.push(entry.file_name());
        }
        names.sort();

        debug_log!(Walk, 3, "{} entries in {}", names.len(), fs_path.display());

        Ok(Self {
            fs_path,
            relative_prefix,
            entries: names.into_iter(),
            depth,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        self.entries.next()
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, WalkError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = env::current_dir().map_err(|error| WalkError::current_dir(path.clone(), error))?;
        Ok(cwd.join(path))
    }
}
