use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use logging::debug_log;
use rustc_hash::FxHashMap;

use crate::error::lossy;
use crate::lines::read_directives;
use crate::{DirectiveError, LoadError};

/// Accepted spellings for the mode-bits prefix of a statoverride line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ModeSyntax {
    /// Signed decimal integer in the 32-bit range (`2`, `+2048`, `-1`).
    #[default]
    Integer,
    /// Any finite decimal floating-point spelling (`2.0`, `1e1`), truncated
    /// toward zero and wrapped to 32 bits. Matches files written for tools
    /// that parsed the prefix with `strtod`.
    Lenient,
}

/// Per-commit table of additive permission bits keyed by repository path.
///
/// Paths are compared byte for byte; no normalisation of slashes, `.` or
/// case takes place. Each path appears at most once and a later directive
/// for the same path replaces the earlier mask. Entries are consumed by
/// [`take`](Self::take) the first time the commit filter matches them, so
/// whatever remains after a walk names directives that matched nothing.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct ModeOverrides {
    entries: FxHashMap<Vec<u8>, u32>,
}

impl ModeOverrides {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of directives still in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no directives remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a directive, returning the mask it replaced.
    pub fn insert(&mut self, path: impl Into<Vec<u8>>, bits: u32) -> Option<u32> {
        self.entries.insert(path.into(), bits)
    }

    /// Returns the mask registered for `path` without consuming it.
    #[must_use]
    pub fn get(&self, path: impl AsRef<[u8]>) -> Option<u32> {
        self.entries.get(path.as_ref()).copied()
    }

    /// Returns `true` when a directive for `path` is present.
    #[must_use]
    pub fn contains(&self, path: impl AsRef<[u8]>) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    /// Removes and returns the mask for `path`.
    pub fn take(&mut self, path: impl AsRef<[u8]>) -> Option<u32> {
        self.entries.remove(path.as_ref())
    }

    /// Iterates over the remaining directives in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u32)> + '_ {
        self.entries
            .iter()
            .map(|(path, bits)| (path.as_slice(), *bits))
    }

    /// Moves every directive of `other` into `self`; `other` wins on
    /// duplicate paths.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Consumes the table and returns its directives sorted by path.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<(Vec<u8>, u32)> {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Parses one `<mode-bits> <path>` line and inserts it.
    ///
    /// Everything after the first space, further spaces included, is the
    /// path.
    ///
    /// # Examples
    ///
    /// ```
    /// use filters::{ModeOverrides, ModeSyntax};
    ///
    /// let mut table = ModeOverrides::new();
    /// table.parse_line(b"2048 /usr/bin/with space", ModeSyntax::Integer).unwrap();
    /// assert_eq!(table.get("/usr/bin/with space"), Some(0o4000));
    ///
    /// assert!(table.parse_line(b"bad-line-no-space", ModeSyntax::Integer).is_err());
    /// ```
    pub fn parse_line(&mut self, line: &[u8], syntax: ModeSyntax) -> Result<(), DirectiveError> {
        let (path, bits) = parse_override_line(line, syntax)?;
        self.insert(path, bits);
        Ok(())
    }

    /// Builds a table from a statoverride source.
    pub fn read_from<R: BufRead>(reader: R, syntax: ModeSyntax) -> Result<Self, LoadError> {
        let mut table = Self::new();
        read_directives(reader, |line| table.parse_line(line, syntax))?;
        Ok(table)
    }

    /// Builds a table from a statoverride file.
    pub fn load(path: &Path, syntax: ModeSyntax) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: Some(path.to_path_buf()),
            source,
        })?;
        let table = Self::read_from(BufReader::new(file), syntax)
            .map_err(|error| error.with_path(path))?;
        debug_log!(
            Filter,
            1,
            "loaded {} statoverride directives from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parses a whole source and merges it into `self`.
    ///
    /// Returns the number of distinct paths read. On failure `self` is left
    /// exactly as it was, even when earlier lines of the source were valid.
    pub fn extend_from_reader<R: BufRead>(
        &mut self,
        reader: R,
        syntax: ModeSyntax,
    ) -> Result<usize, LoadError> {
        let staged = Self::read_from(reader, syntax)?;
        let count = staged.len();
        self.merge(staged);
        Ok(count)
    }
}

impl fmt::Debug for ModeOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(path, bits)| (lossy(path), format!("{bits:#o}"))),
            )
            .finish()
    }
}

impl<P: Into<Vec<u8>>> FromIterator<(P, u32)> for ModeOverrides {
    fn from_iter<I: IntoIterator<Item = (P, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<P: Into<Vec<u8>>> Extend<(P, u32)> for ModeOverrides {
    fn extend<I: IntoIterator<Item = (P, u32)>>(&mut self, iter: I) {
        for (path, bits) in iter {
            self.insert(path, bits);
        }
    }
}

/// Splits a statoverride line into its path and mode mask.
pub fn parse_override_line(
    line: &[u8],
    syntax: ModeSyntax,
) -> Result<(Vec<u8>, u32), DirectiveError> {
    let Some(space) = line.iter().position(|&byte| byte == b' ') else {
        return Err(DirectiveError::MalformedDirective {
            line: line.to_vec(),
        });
    };
    let (prefix, rest) = line.split_at(space);
    let bits = parse_mode_bits(prefix, syntax).ok_or_else(|| DirectiveError::InvalidModeBits {
        line: line.to_vec(),
    })?;
    Ok((rest[1..].to_vec(), bits))
}

fn parse_mode_bits(prefix: &[u8], syntax: ModeSyntax) -> Option<u32> {
    let text = std::str::from_utf8(prefix).ok()?;
    let signed = match syntax {
        ModeSyntax::Integer => text.parse::<i32>().ok()?,
        ModeSyntax::Lenient => {
            let value = text.parse::<f64>().ok()?;
            if !value.is_finite() {
                return None;
            }
            // Float-to-int casts saturate; the i64 hop keeps 32-bit wrapping.
            value.trunc() as i64 as i32
        }
    };
    Some(signed as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_syntax_accepts_signed_decimal() {
        assert_eq!(parse_mode_bits(b"2", ModeSyntax::Integer), Some(2));
        assert_eq!(parse_mode_bits(b"+2048", ModeSyntax::Integer), Some(2048));
        assert_eq!(parse_mode_bits(b"-1", ModeSyntax::Integer), Some(u32::MAX));
    }

    #[test]
    fn integer_syntax_rejects_floats_and_overflow() {
        assert_eq!(parse_mode_bits(b"2.0", ModeSyntax::Integer), None);
        assert_eq!(parse_mode_bits(b"1e1", ModeSyntax::Integer), None);
        assert_eq!(parse_mode_bits(b"2147483648", ModeSyntax::Integer), None);
        assert_eq!(parse_mode_bits(b"", ModeSyntax::Integer), None);
        assert_eq!(parse_mode_bits(b"0o2", ModeSyntax::Integer), None);
    }

    #[test]
    fn lenient_syntax_truncates_toward_zero() {
        assert_eq!(parse_mode_bits(b"2.9", ModeSyntax::Lenient), Some(2));
        assert_eq!(parse_mode_bits(b"1e1", ModeSyntax::Lenient), Some(10));
        assert_eq!(parse_mode_bits(b"-1.5", ModeSyntax::Lenient), Some(u32::MAX));
        assert_eq!(
            parse_mode_bits(b"4294967298", ModeSyntax::Lenient),
            Some(2),
            "values wrap to 32 bits"
        );
    }

    #[test]
    fn lenient_syntax_rejects_non_finite() {
        assert_eq!(parse_mode_bits(b"nan", ModeSyntax::Lenient), None);
        assert_eq!(parse_mode_bits(b"inf", ModeSyntax::Lenient), None);
    }

    #[test]
    fn path_keeps_everything_after_first_space() {
        let (path, bits) = parse_override_line(b"4 /a b  c ", ModeSyntax::Integer).expect("valid");
        assert_eq!(path, b"/a b  c ");
        assert_eq!(bits, 4);
    }

    #[test]
    fn space_first_line_has_invalid_bits() {
        let error = parse_override_line(b" /a", ModeSyntax::Integer).expect_err("no bits");
        assert!(matches!(error, DirectiveError::InvalidModeBits { .. }));
    }

    #[test]
    fn later_directive_for_same_path_wins() {
        let table = ModeOverrides::read_from(&b"2 /a\n4 /a\n"[..], ModeSyntax::Integer)
            .expect("valid source");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("/a"), Some(4));
    }

    #[test]
    fn take_consumes_entry_once() {
        let mut table: ModeOverrides = [("/a", 2)].into_iter().collect();
        assert_eq!(table.take("/a"), Some(2));
        assert_eq!(table.take("/a"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn debug_output_renders_octal_masks() {
        let table: ModeOverrides = [("/a", 0o2000)].into_iter().collect();
        assert_eq!(format!("{table:?}"), "{\"/a\": \"0o2000\"}");
    }
}
