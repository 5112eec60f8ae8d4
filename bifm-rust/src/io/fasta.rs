use anyhow::{bail, Result};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

/// Streaming FASTA reader; yields one record per `>` header.
///
/// Sequence lines are concatenated with whitespace removed. Case is preserved
/// because every alphabet decides for itself how to treat lowercase.
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: String,
    pending_header: Option<String>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending_header: None,
            line_no: 0,
            done: false,
        }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        let n = self.reader.read_line(&mut self.line)?;
        self.line_no += 1;
        Ok(n > 0)
    }

    fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        let header = match self.pending_header.take() {
            Some(h) => h,
            None => loop {
                if !self.read_line()? {
                    self.done = true;
                    return Ok(None);
                }
                let trimmed = self.line.trim();
                if let Some(h) = trimmed.strip_prefix('>') {
                    break h.to_string();
                }
                if !trimmed.is_empty() {
                    bail!("line {}: sequence data before the first '>' header", self.line_no);
                }
            },
        };

        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or_default().to_string();
        let desc = parts.next().map(str::trim).filter(|s| !s.is_empty()).map(String::from);

        let mut seq = Vec::new();
        while self.read_line()? {
            if let Some(h) = self.line.trim_start().strip_prefix('>') {
                self.pending_header = Some(h.trim().to_string());
                return Ok(Some(FastaRecord { id, desc, seq }));
            }
            seq.extend(self.line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }
        self.done = true;
        Ok(Some(FastaRecord { id, desc, seq }))
    }

    /// Reads every remaining record.
    pub fn read_all(self) -> Result<Vec<FastaRecord>> {
        self.collect()
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
