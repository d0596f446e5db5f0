use std::io::Read;

use super::{Blob, EntryMode};
use crate::error::Result;
use crate::hash::Hash;

/// A blob reached through a tree, together with the entry name it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File<'s> {
    pub name: String,
    pub mode: EntryMode,
    pub blob: Blob<'s>,
}

impl<'s> File<'s> {
    pub fn new(name: impl Into<String>, mode: EntryMode, blob: Blob<'s>) -> Self {
        Self {
            name: name.into(),
            mode,
            blob,
        }
    }

    pub fn hash(&self) -> Hash {
        self.blob.hash
    }

    pub fn size(&self) -> usize {
        self.blob.size()
    }

    pub fn reader(&self) -> impl Read + 's {
        self.blob.reader()
    }

    /// Full contents as text.
    pub fn contents(&self) -> Result<String> {
        let mut content = String::with_capacity(self.size());
        self.reader().read_to_string(&mut content)?;
        Ok(content)
    }

    /// Contents split on `\n`. A single empty segment left by a final newline is
    /// dropped; interior blank lines are kept.
    pub fn lines(&self) -> Result<Vec<String>> {
        let content = self.contents()?;
        let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

        if lines.last().is_some_and(|last| last.is_empty()) {
            lines.pop();
        }

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use gix_object::Kind;

    use super::*;
    use crate::object::{Decode, RawObject};
    use crate::storage::MemoryStore;

    fn lines_of(content: &str) -> Vec<String> {
        let store = MemoryStore::new();
        let raw = RawObject::new(Kind::Blob, content.as_bytes().to_vec());
        let blob = Blob::decode(&store, &raw).unwrap();
        File::new("test.txt", EntryMode::BLOB, blob).lines().unwrap()
    }

    #[test]
    fn test_lines_trailing_newline() {
        let content = "one\ntwo\nthree\n";
        let lines = lines_of(content);
        assert_eq!(lines, vec!["one", "two", "three"]);
        assert_eq!(lines.len(), content.split('\n').count() - 1);
    }

    #[test]
    fn test_lines_without_trailing_newline() {
        let content = "one\ntwo\nthree";
        let lines = lines_of(content);
        let expected: Vec<&str> = content.split('\n').collect();
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_lines_keeps_interior_blank_lines() {
        assert_eq!(lines_of("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(lines_of("a\n\n"), vec!["a", ""]);
    }

    #[test]
    fn test_lines_empty() {
        assert!(lines_of("").is_empty());
        assert_eq!(lines_of("\n"), vec![""]);
    }

    #[test]
    fn test_contents() {
        let store = MemoryStore::new();
        let raw = RawObject::new(Kind::Blob, b"hello\n".to_vec());
        let file = File::new("hello.txt", EntryMode::BLOB, Blob::decode(&store, &raw).unwrap());

        assert_eq!(file.contents().unwrap(), "hello\n");
        assert_eq!(file.hash(), raw.hash());
        assert_eq!(file.size(), 6);
    }

    #[test]
    fn test_contents_rejects_invalid_utf8() {
        let store = MemoryStore::new();
        let raw = RawObject::new(Kind::Blob, vec![0xff, 0xfe]);
        let file = File::new("bin", EntryMode::BLOB, Blob::decode(&store, &raw).unwrap());

        assert!(file.contents().is_err());
    }
}
