use std::io::{self, Write};

use filters::{FilterStats, Leftovers};
use metadata::{EntryKind, EntryMetadata, MetadataRecord};
use serde::{Serialize, Serializer};

/// One entry the commit would contain, with its final metadata.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ManifestEntry {
    /// Repository path (`/` for the root).
    #[serde(serialize_with = "serialize_bytes_lossy")]
    pub path: Vec<u8>,
    /// Entry type.
    pub kind: EntryKind,
    /// Full POSIX mode after statoverride bits were added.
    pub mode: u32,
    /// Owning uid after the owner override.
    pub uid: u32,
    /// Owning gid after the owner override.
    pub gid: u32,
}

impl ManifestEntry {
    /// Snapshots `metadata` for `path`.
    #[must_use]
    pub fn new(path: Vec<u8>, metadata: &EntryMetadata) -> Self {
        Self {
            path,
            kind: metadata.kind(),
            mode: metadata.mode(),
            uid: metadata.uid(),
            gid: metadata.gid(),
        }
    }

    /// Path rendered for display; invalid UTF-8 is replaced.
    #[must_use]
    pub fn display_path(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }
}

/// Outcome of a commit preview.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommitReport {
    /// Allowed entries in walk order. When sources overlap, a later source
    /// replaces the entry in place.
    pub entries: Vec<ManifestEntry>,
    /// Filter counters for the whole preview.
    pub stats: FilterStats,
    /// Directives that never matched an entry.
    pub leftovers: Leftovers,
}

impl CommitReport {
    /// Looks up the manifest entry for `path`.
    #[must_use]
    pub fn entry(&self, path: impl AsRef<[u8]>) -> Option<&ManifestEntry> {
        let path = path.as_ref();
        self.entries.iter().find(|entry| entry.path == path)
    }

    /// Writes one `<mode> <uid> <gid> <kind> <path>` line per entry, with the
    /// mode in octal and the path as raw bytes.
    pub fn write_text<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for entry in &self.entries {
            write!(
                out,
                "{:o} {} {} {} ",
                entry.mode, entry.uid, entry.gid, entry.kind
            )?;
            out.write_all(&entry.path)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Writes the report as pretty-printed JSON followed by a newline.
    pub fn write_json<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, &JsonReport::from(self))?;
        out.write_all(b"\n")
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    entries: &'a [ManifestEntry],
    stats: JsonStats,
    leftovers: JsonLeftovers<'a>,
}

#[derive(Serialize)]
struct JsonStats {
    entries: u64,
    allowed: u64,
    skipped: u64,
    owner_rewrites: u64,
    mode_additions: u64,
}

#[derive(Serialize)]
struct JsonLeftovers<'a> {
    statoverride: Vec<JsonOverride<'a>>,
    skip_list: Vec<String>,
}

#[derive(Serialize)]
struct JsonOverride<'a> {
    #[serde(serialize_with = "serialize_bytes_lossy")]
    path: &'a [u8],
    bits: u32,
}

impl<'a> From<&'a CommitReport> for JsonReport<'a> {
    fn from(report: &'a CommitReport) -> Self {
        let stats = report.stats;
        Self {
            entries: &report.entries,
            stats: JsonStats {
                entries: stats.entries,
                allowed: stats.allowed(),
                skipped: stats.skipped,
                owner_rewrites: stats.owner_rewrites,
                mode_additions: stats.mode_additions,
            },
            leftovers: JsonLeftovers {
                statoverride: report
                    .leftovers
                    .mode_overrides
                    .iter()
                    .map(|(path, bits)| JsonOverride { path, bits: *bits })
                    .collect(),
                skip_list: report
                    .leftovers
                    .skips
                    .iter()
                    .map(|path| String::from_utf8_lossy(path).into_owned())
                    .collect(),
            },
        }
    }
}

fn serialize_bytes_lossy<S, B>(bytes: &B, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    B: AsRef<[u8]> + ?Sized,
{
    serializer.serialize_str(&String::from_utf8_lossy(bytes.as_ref()))
}
