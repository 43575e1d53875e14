//! Line-oriented input handling
//!
//! All converters stream their inputs line by line. Annotation files from
//! reference providers are routinely gzipped, so readers are selected by
//! file extension and gzip is decoded transparently.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Open a text input for line reading, decoding gzip when the file name
/// ends in `.gz`.
pub fn open_line_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let is_gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gzip {
        let decoder = MultiGzDecoder::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file));
        Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)))
    }
}

/// Line iterator that reuses a buffer to avoid per-line allocations
pub struct LineIterator<R: BufRead> {
    reader: R,
    buffer: String,
    line_number: usize,
}

impl<R: BufRead> LineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(1024),
            line_number: 0,
        }
    }

    /// Read the next line into the internal buffer.
    /// Returns None at EOF; on success yields the one-based line number
    /// together with the line, newline stripped.
    pub fn next_line(&mut self) -> Option<io::Result<(usize, &str)>> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None, // EOF
            Ok(_) => {
                self.line_number += 1;
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok((self.line_number, &self.buffer)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_line_iterator() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "line1")?;
        writeln!(temp, "line2")?;
        write!(temp, "line3")?;
        temp.flush()?;

        let reader = open_line_reader(temp.path())?;
        let mut iter = LineIterator::new(reader);

        assert_eq!(iter.next_line().unwrap()?, (1, "line1"));
        assert_eq!(iter.next_line().unwrap()?, (2, "line2"));
        assert_eq!(iter.next_line().unwrap()?, (3, "line3"));
        assert!(iter.next_line().is_none());
        Ok(())
    }

    #[test]
    fn test_line_iterator_strips_crlf() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"a\r\nb\r\n")?;
        temp.flush()?;

        let reader = open_line_reader(temp.path())?;
        let mut iter = LineIterator::new(reader);
        assert_eq!(iter.next_line().unwrap()?.1, "a");
        assert_eq!(iter.next_line().unwrap()?.1, "b");
        Ok(())
    }

    #[test]
    fn test_gzip_transparent_reading() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("input.txt.gz");
        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"chr1\t100\t200\nchr2\t300\t400\n")?;
        encoder.finish()?;

        let reader = open_line_reader(&path)?;
        let mut iter = LineIterator::new(reader);
        assert_eq!(iter.next_line().unwrap()?.1, "chr1\t100\t200");
        assert_eq!(iter.next_line().unwrap()?.1, "chr2\t300\t400");
        assert!(iter.next_line().is_none());
        Ok(())
    }
}
