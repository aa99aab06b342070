//! Incremental read position for a single log file.

use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Tail bookkeeping for the tracked file.
///
/// `byte_offset` only moves forward while the path stays the same. It is
/// reset to zero when the path changes or when the file is found to be
/// shorter than the offset (truncation or rotation).
#[derive(Debug, Default)]
pub struct TailState {
    file_path: Option<PathBuf>,
    byte_offset: u64,
    last_line: String,
    last_modified_label: String,
    /// Bytes read after the last newline; completed on a later read.
    partial: Vec<u8>,
}

impl TailState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn byte_offset(&self) -> u64 {
        self.byte_offset
    }

    pub fn last_line(&self) -> &str {
        &self.last_line
    }

    pub fn last_modified_label(&self) -> &str {
        &self.last_modified_label
    }

    /// Points the tail at `path`. Returns `false` if it was already there,
    /// in which case the offset is left untouched.
    pub fn set_path(&mut self, path: &Path) -> bool {
        if self.file_path.as_deref() == Some(path) {
            return false;
        }
        self.file_path = Some(path.to_path_buf());
        self.rewind();
        true
    }

    /// Stores a new modification label. Returns `true` if it changed.
    pub fn set_last_modified(&mut self, label: String) -> bool {
        crate::event::replace_if_changed(&mut self.last_modified_label, label)
    }

    /// Reads everything between the stored offset and `size`, returning the
    /// complete non-empty lines in order.
    ///
    /// A trailing fragment without a newline is held back and prefixed to
    /// the next read. `size` is the current length of the file behind
    /// `reader`.
    pub fn read_appended<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        size: u64,
    ) -> io::Result<Vec<String>> {
        if size < self.byte_offset {
            tracing::info!(
                offset = self.byte_offset,
                size,
                "log file shrank, re-reading from start"
            );
            self.rewind();
        }

        if size == self.byte_offset {
            return Ok(Vec::new());
        }

        reader.seek(SeekFrom::Start(self.byte_offset))?;
        let mut buf = Vec::with_capacity((size - self.byte_offset) as usize);
        (&mut *reader)
            .take(size - self.byte_offset)
            .read_to_end(&mut buf)?;

        // The file may have shrunk between the size query and the read.
        self.byte_offset += buf.len() as u64;
        self.partial.extend_from_slice(&buf);

        Ok(self.drain_complete_lines())
    }

    fn rewind(&mut self) {
        self.byte_offset = 0;
        self.partial.clear();
    }

    fn drain_complete_lines(&mut self) -> Vec<String> {
        let Some(end) = self.partial.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };

        let rest = self.partial.split_off(end + 1);
        let complete = std::mem::replace(&mut self.partial, rest);

        let lines: Vec<String> = complete
            .split(|&b| b == b'\n')
            .map(|raw| {
                String::from_utf8_lossy(raw)
                    .trim_end_matches('\r')
                    .to_string()
            })
            .filter(|line| !line.is_empty())
            .collect();

        if let Some(last) = lines.last() {
            self.last_line.clone_from(last);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(state: &mut TailState, content: &[u8]) -> Vec<String> {
        let mut cursor = Cursor::new(content.to_vec());
        state
            .read_appended(&mut cursor, content.len() as u64)
            .unwrap()
    }

    #[test]
    fn reads_complete_lines_and_advances() {
        let mut state = TailState::new();
        let lines = read(&mut state, b"A\nB\n");
        assert_eq!(lines, vec!["A", "B"]);
        assert_eq!(state.byte_offset(), 4);
        assert_eq!(state.last_line(), "B");
    }

    #[test]
    fn only_new_bytes_are_returned() {
        let mut state = TailState::new();
        read(&mut state, b"A\nB\n");
        let lines = read(&mut state, b"A\nB\nC\nD\n");
        assert_eq!(lines, vec!["C", "D"]);
        assert_eq!(state.byte_offset(), 8);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut state = TailState::new();
        let lines = read(&mut state, b"first\n\n\nsecond\n\n");
        assert_eq!(lines, vec!["first", "second"]);
        assert_eq!(state.last_line(), "second");
    }

    #[test]
    fn partial_line_held_until_newline() {
        let mut state = TailState::new();
        let lines = read(&mut state, b"done\nhalf");
        assert_eq!(lines, vec!["done"]);
        assert_eq!(state.byte_offset(), 9);
        assert_eq!(state.last_line(), "done");

        let lines = read(&mut state, b"done\nhalf way\n");
        assert_eq!(lines, vec!["half way"]);
        assert_eq!(state.byte_offset(), 14);
    }

    #[test]
    fn crlf_is_stripped() {
        let mut state = TailState::new();
        let lines = read(&mut state, b"<ts> hello\r\n<ts> world\r\n");
        assert_eq!(lines, vec!["<ts> hello", "<ts> world"]);
    }

    #[test]
    fn shrink_rewinds_to_start() {
        let mut state = TailState::new();
        read(&mut state, b"one\ntwo\nthree\n");
        assert_eq!(state.byte_offset(), 14);

        let lines = read(&mut state, b"x\n");
        assert_eq!(lines, vec!["x"]);
        assert_eq!(state.byte_offset(), 2);
        assert_eq!(state.last_line(), "x");
    }

    #[test]
    fn shrink_discards_pending_fragment() {
        let mut state = TailState::new();
        read(&mut state, b"line\nfragment");
        let lines = read(&mut state, b"new\n");
        assert_eq!(lines, vec!["new"]);
    }

    #[test]
    fn unchanged_size_reads_nothing() {
        let mut state = TailState::new();
        read(&mut state, b"A\n");
        assert!(read(&mut state, b"A\n").is_empty());
        assert_eq!(state.byte_offset(), 2);
    }

    #[test]
    fn new_path_resets_offset() {
        let mut state = TailState::new();
        assert!(state.set_path(Path::new("/sc/LIVE/Game.log")));
        read(&mut state, b"A\nB\n");
        assert!(!state.set_path(Path::new("/sc/LIVE/Game.log")));
        assert_eq!(state.byte_offset(), 4);

        assert!(state.set_path(Path::new("/sc/PTU/Game.log")));
        assert_eq!(state.byte_offset(), 0);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut state = TailState::new();
        let lines = read(&mut state, b"ok \xff\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("ok "));
    }
}
