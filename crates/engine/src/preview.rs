use std::path::{Path, PathBuf};

use filters::{CommitFilter, FilterContext, ModeOverrides, SkipList, Verdict};
use logging::{info_log, trace_filter, trace_stats, trace_walk};
use metadata::{EntryMetadata, OwnerOverride};
use rustc_hash::FxHashMap;
use walk::{WalkBuilder, WalkError};

use crate::error::{EngineError, EngineResult};
use crate::manifest::{CommitReport, ManifestEntry};
use crate::options::{CommitOptions, TreeKind};

/// Computes what a commit of `options` would contain without writing anything.
///
/// All configuration is validated and both directive files are loaded before
/// the first tree is touched. Tree sources are then walked in order through a
/// single [`FilterContext`], so a directive consumed by an earlier source is
/// not applied again by a later one.
///
/// # Errors
///
/// Returns [`EngineError`] when no tree is given, a tree kind cannot be
/// walked, the owner override is out of range, a directive file fails to
/// load, or a tree cannot be read.
///
/// # Examples
///
/// ```
/// use engine::{CommitOptions, TreeSpec, commit_preview};
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = tempfile::tempdir()?;
/// std::fs::write(tree.path().join("motd"), b"hello")?;
///
/// let options = CommitOptions::new()
///     .tree(TreeSpec::dir(tree.path()))
///     .owner_uid(0)
///     .owner_gid(0);
/// let report = commit_preview(&options)?;
///
/// let motd = report.entry("/motd").expect("file is committed");
/// assert_eq!((motd.uid, motd.gid), (0, 0));
/// assert!(report.leftovers.is_empty());
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
pub fn commit_preview(options: &CommitOptions) -> EngineResult<CommitReport> {
    let roots = dir_roots(options)?;

    let (uid, gid) = options.raw_owner();
    let owner = OwnerOverride::from_raw(uid, gid)?;

    let overrides = match options.statoverride_path() {
        Some(path) => ModeOverrides::load(path, options.syntax())?,
        None => ModeOverrides::new(),
    };
    let skips = match options.skip_list_path() {
        Some(path) => SkipList::load(path)?,
        None => SkipList::new(),
    };
    trace_filter!(
        statoverride = overrides.len(),
        skip_list = skips.len(),
        "filter tables loaded"
    );

    let mut context = FilterContext::new(overrides, skips, owner);
    let mut manifest = Manifest::default();
    for root in &roots {
        walk_tree(root, &mut context, &mut manifest)?;
    }

    let stats = context.stats();
    trace_stats!(
        entries = stats.entries,
        allowed = stats.allowed(),
        skipped = stats.skipped,
        owner_rewrites = stats.owner_rewrites,
        mode_additions = stats.mode_additions,
        "commit preview complete"
    );

    Ok(CommitReport {
        entries: manifest.entries,
        stats,
        leftovers: context.finish(),
    })
}

fn dir_roots(options: &CommitOptions) -> EngineResult<Vec<PathBuf>> {
    if options.tree_specs().is_empty() {
        return Err(EngineError::NoTrees);
    }
    options
        .tree_specs()
        .iter()
        .map(|spec| match spec.kind() {
            TreeKind::Dir => Ok(PathBuf::from(spec.value())),
            kind => Err(EngineError::UnsupportedTreeSource {
                kind,
                value: spec.value().to_owned(),
            }),
        })
        .collect()
}

/// Walks one directory through `filter`, appending allowed entries.
///
/// Skipped directories are pruned so none of their descendants reach the
/// filter.
pub fn walk_tree<F>(root: &Path, filter: &mut F, manifest: &mut Manifest) -> Result<(), WalkError>
where
    F: CommitFilter + ?Sized,
{
    trace_walk!("walking tree source {}", root.display());
    let mut walker = WalkBuilder::new(root).build()?;

    while let Some(entry) = walker.next() {
        let entry = entry?;
        let path = entry.repository_path();
        let mut record = EntryMetadata::from_fs(entry.metadata());

        match filter.filter(&path, &mut record) {
            Verdict::Allow => {
                info_log!(Name, 1, "{}", String::from_utf8_lossy(&path));
                manifest.insert(ManifestEntry::new(path, &record));
            }
            Verdict::Skip => {
                if record.kind().is_dir() {
                    walker.skip_current_dir();
                }
            }
        }
    }
    Ok(())
}

/// Allowed entries keyed by path, in first-seen order.
#[derive(Debug, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    index: FxHashMap<Vec<u8>, usize>,
}

impl Manifest {
    /// Adds `entry`, replacing an earlier entry for the same path in place.
    pub fn insert(&mut self, entry: ManifestEntry) {
        if let Some(&slot) = self.index.get(&entry.path) {
            self.entries[slot] = entry;
        } else {
            self.index.insert(entry.path.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    /// Number of distinct paths recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the manifest, returning its entries in order.
    #[must_use]
    pub fn into_entries(self) -> Vec<ManifestEntry> {
        self.entries
    }
}
