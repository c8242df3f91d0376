use logging::{debug_log, info_log};
use metadata::{MetadataRecord, OwnerOverride};

use crate::error::lossy;
use crate::{ModeOverrides, SkipList, Verdict};

/// Per-entry decision hook invoked by a tree walker.
///
/// Walkers call [`filter`](Self::filter) exactly once per visited entry, in
/// traversal order, and must not ingest an entry that comes back as
/// [`Verdict::Skip`].
pub trait CommitFilter {
    /// Decides whether `path` enters the commit, rewriting `metadata` in place.
    fn filter(&mut self, path: &[u8], metadata: &mut dyn MetadataRecord) -> Verdict;
}

/// Counters accumulated by a [`FilterContext`] over one walk.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FilterStats {
    /// Entries the filter was invoked for.
    pub entries: u64,
    /// Entries whose uid and/or gid were overwritten.
    pub owner_rewrites: u64,
    /// Statoverride directives applied.
    pub mode_additions: u64,
    /// Entries excluded by the skip list.
    pub skipped: u64,
}

impl FilterStats {
    /// Entries that were allowed into the commit.
    #[must_use]
    pub const fn allowed(&self) -> u64 {
        self.entries - self.skipped
    }
}

/// Directives that were never matched by a walked entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Leftovers {
    /// Unconsumed statoverride directives, sorted by path.
    pub mode_overrides: Vec<(Vec<u8>, u32)>,
    /// Unconsumed skip-list paths, sorted.
    pub skips: Vec<Vec<u8>>,
}

impl Leftovers {
    /// Returns `true` when every directive matched an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode_overrides.is_empty() && self.skips.is_empty()
    }

    /// Total number of unmatched directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mode_overrides.len() + self.skips.len()
    }
}

/// State shared by every filter invocation of one commit operation.
///
/// The context owns its tables outright; each commit builds its own and
/// hands the context to the walker by exclusive reference, so concurrent
/// commits never observe each other's consumption.
#[derive(Clone, Debug, Default)]
pub struct FilterContext {
    overrides: ModeOverrides,
    skips: SkipList,
    owner: OwnerOverride,
    stats: FilterStats,
}

impl FilterContext {
    /// Creates a context from loaded tables and a validated owner override.
    #[must_use]
    pub fn new(overrides: ModeOverrides, skips: SkipList, owner: OwnerOverride) -> Self {
        Self {
            overrides,
            skips,
            owner,
            stats: FilterStats::default(),
        }
    }

    /// Remaining statoverride directives.
    #[must_use]
    pub const fn overrides(&self) -> &ModeOverrides {
        &self.overrides
    }

    /// Remaining skip-list paths.
    #[must_use]
    pub const fn skips(&self) -> &SkipList {
        &self.skips
    }

    /// Commit-wide owner override.
    #[must_use]
    pub const fn owner(&self) -> OwnerOverride {
        self.owner
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Applies owner overrides, statoverride bits and the skip list to one
    /// entry, in that order.
    ///
    /// Rewrites happen before the skip check, so a skipped entry still comes
    /// back with its metadata modified; callers drop it together with the
    /// entry. Matched directives are removed from their tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use filters::{FilterContext, ModeOverrides, SkipList, Verdict};
    /// use metadata::{EntryKind, EntryMetadata, MetadataRecord, OwnerOverride};
    ///
    /// let overrides: ModeOverrides = [("/a/b", 0o2)].into_iter().collect();
    /// let mut context = FilterContext::new(overrides, SkipList::new(), OwnerOverride::none());
    ///
    /// let mut entry = EntryMetadata::new(EntryKind::File, 0, 0, 0o644);
    /// assert_eq!(context.decide("/a/b", &mut entry), Verdict::Allow);
    /// assert_eq!(entry.mode(), 0o646);
    /// assert!(context.overrides().is_empty());
    /// ```
    pub fn decide<P, M>(&mut self, path: P, metadata: &mut M) -> Verdict
    where
        P: AsRef<[u8]>,
        M: MetadataRecord + ?Sized,
    {
        let path = path.as_ref();
        self.stats.entries += 1;

        if self.owner.apply(metadata) {
            self.stats.owner_rewrites += 1;
            debug_log!(
                Own,
                2,
                "{}: owner now {}:{}",
                lossy(path),
                metadata.uid(),
                metadata.gid()
            );
        }

        if let Some(bits) = self.overrides.take(path) {
            let mode = metadata.mode();
            metadata.set_mode(mode | bits);
            self.stats.mode_additions += 1;
            debug_log!(
                Perms,
                1,
                "{}: mode {:o} | {:o} -> {:o}",
                lossy(path),
                mode,
                bits,
                mode | bits
            );
        }

        if self.skips.take(path) {
            self.stats.skipped += 1;
            info_log!(Skip, 1, "skipping {}", lossy(path));
            return Verdict::Skip;
        }

        debug_log!(Filter, 2, "{}: allow", lossy(path));
        Verdict::Allow
    }

    /// Ends the walk and returns the directives that never matched.
    #[must_use]
    pub fn finish(self) -> Leftovers {
        Leftovers {
            mode_overrides: self.overrides.into_sorted_vec(),
            skips: self.skips.into_sorted_vec(),
        }
    }
}

impl CommitFilter for FilterContext {
    fn filter(&mut self, path: &[u8], metadata: &mut dyn MetadataRecord) -> Verdict {
        self.decide(path, metadata)
    }
}

/// Runs the commit filter for one entry against `context`.
///
/// Free-function form of [`FilterContext::decide`] for walkers that keep the
/// context alongside other state.
pub fn commit_filter<P, M>(path: P, metadata: &mut M, context: &mut FilterContext) -> Verdict
where
    P: AsRef<[u8]>,
    M: MetadataRecord + ?Sized,
{
    context.decide(path, metadata)
}
