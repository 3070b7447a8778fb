//! Newline-delimited contract address lists

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Lazily yields one address per input line, in file order.
///
/// Lines are passed through as read: blank lines come out as empty addresses
/// and nothing is checked for hex format.
pub struct AddressReader {
    lines: Lines<BufReader<File>>,
}

impl AddressReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("Reading contract addresses from {:?}", path);

        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }
}

impl Iterator for AddressReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(|line| line.map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetcherError;
    use std::io::Write;

    fn collect(content: &str) -> Vec<String> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        AddressReader::open(file.path())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_reads_in_file_order() {
        let addresses = collect("0xaaa\n0xbbb\r\n0xccc");
        assert_eq!(addresses, vec!["0xaaa", "0xbbb", "0xccc"]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let addresses = collect("0xaaa\n\n0xbbb\n");
        assert_eq!(addresses, vec!["0xaaa", "", "0xbbb"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let addresses = collect("0xaaa\n0xaaa\n");
        assert_eq!(addresses, vec!["0xaaa", "0xaaa"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AddressReader::open(dir.path().join("missing.csv"));
        assert!(matches!(result, Err(FetcherError::Io(_))));
    }
}
