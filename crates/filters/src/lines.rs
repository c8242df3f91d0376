use std::io::{self, BufRead};

use crate::{DirectiveError, LoadError};

/// Iterator over the lines of a directive source.
///
/// Lines are split on `\n`; a single trailing `\r` is dropped so files
/// written on Windows parse identically. All other bytes, including leading
/// and trailing spaces, are preserved.
pub(crate) struct DirectiveLines<R> {
    inner: io::Split<R>,
    number: usize,
}

impl<R: BufRead> DirectiveLines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            inner: reader.split(b'\n'),
            number: 0,
        }
    }
}

impl<R: BufRead> Iterator for DirectiveLines<R> {
    type Item = io::Result<(usize, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.inner.next()?;
        self.number += 1;
        let number = self.number;
        Some(line.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            (number, bytes)
        }))
    }
}

/// Feeds every line of `reader` to `apply`, stopping at the first failure.
pub(crate) fn read_directives<R, F>(reader: R, mut apply: F) -> Result<usize, LoadError>
where
    R: BufRead,
    F: FnMut(&[u8]) -> Result<(), DirectiveError>,
{
    let mut count = 0;
    for line in DirectiveLines::new(reader) {
        let (line_number, bytes) = line.map_err(|source| LoadError::Io { path: None, source })?;
        apply(&bytes).map_err(|source| LoadError::Directive {
            path: None,
            line_number,
            source,
        })?;
        count += 1;
    }
    Ok(count)
}
