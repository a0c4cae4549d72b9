//! Word/tag reference corpus reading.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines, Read};
use std::path::Path;

/// One sentence of a reference corpus: parallel word and tag arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTagSample {
    words: Vec<String>,
    tags: Vec<String>,
}

impl WordTagSample {
    pub fn new(words: Vec<String>, tags: Vec<String>) -> Self {
        debug_assert_eq!(words.len(), tags.len());
        Self { words, tags }
    }

    /// Parse one `word_TAG word_TAG ...` line. The delimiter is the *last*
    /// underscore of each token, so words may themselves contain
    /// underscores. Returns `None` if any token carries no tag.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = Vec::new();
        let mut tags = Vec::new();
        for token in line.split_whitespace() {
            let (word, tag) = token.rsplit_once('_')?;
            if word.is_empty() || tag.is_empty() {
                return None;
            }
            words.push(word.to_string());
            tags.push(tag.to_string());
        }
        Some(Self { words, tags })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Lazy, forward-only reader over a word/tag corpus.
///
/// Yields one [`WordTagSample`] per non-empty line. The stream is
/// single-pass: once exhausted, a second pass requires reopening the
/// source. Lines that fail to parse are logged and skipped rather than
/// aborting the pass.
#[derive(Debug)]
pub struct WordTagSampleStream<R> {
    lines: Lines<BufReader<R>>,
}

impl WordTagSampleStream<File> {
    /// Open a corpus file. Fails with an I/O error if the path is
    /// unreadable.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> WordTagSampleStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }
}

impl<R: Read> Iterator for WordTagSampleStream<R> {
    type Item = io::Result<WordTagSample>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            if line.trim().is_empty() {
                continue;
            }
            match WordTagSample::parse(&line) {
                Some(sample) => return Some(Ok(sample)),
                None => log::warn!("ignoring untaggable sentence: {line}"),
            }
        }
    }
}
