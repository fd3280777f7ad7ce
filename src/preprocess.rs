//! Line stitching for extracted statement text.
//!
//! PDF text extraction breaks a single statement row over several physical
//! lines and interleaves page headers and footers. The stitcher rebuilds one
//! candidate line per transaction. A candidate starts where a physical line
//! begins with a `DD-MM-YY` date prefix; every following line without that
//! prefix is glued onto it.

use log::debug;

/// Prefixes of page furniture lines. Seeing one drops the line and resets
/// any stitching in progress.
pub const FURNITURE_PREFIXES: [&str; 3] = ["Issued by K PLUS", "KBPDF", "For more information"];

/// Returns `true` if `line` begins with a `DD-MM-YY` date prefix.
pub fn is_valid_starter(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 8 {
        return false;
    }

    bytes[..8].iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

/// Returns `true` if `line` is a page header or footer.
pub fn is_furniture(line: &str) -> bool {
    FURNITURE_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// Incremental stitcher over the physical line stream.
///
/// Feed lines in order with [`push`](Self::push) and collect the candidates
/// with [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct LineStitcher {
    /// Last non-furniture line seen; cleared by furniture.
    prev: String,

    /// Continuation text for the transaction started by `prev`.
    buffer: String,

    /// Last non-furniture line seen; survives furniture.
    last_line: String,

    candidates: Vec<String>,
}

impl LineStitcher {
    /// Creates an empty stitcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one physical line.
    pub fn push(&mut self, line: &str) {
        if is_furniture(line) {
            if !self.buffer.is_empty() {
                debug!("Furniture {:?} discards partial line {:?}", line, self.buffer);
            }
            self.buffer.clear();
            self.prev.clear();
            return;
        }

        let is_starter = is_valid_starter(line);

        if is_starter && !self.buffer.is_empty() {
            // The buffer holds a complete transaction
            let completed = std::mem::take(&mut self.buffer);
            if is_valid_starter(&completed) {
                self.emit(completed);
            } else {
                debug!("Dropping stitched text without date prefix: {:?}", completed);
            }
        } else if !is_starter {
            if self.buffer.is_empty() {
                self.buffer.push_str(&self.prev);
            }
            self.buffer.push_str(line);
        } else {
            // Previous starter had no continuation lines
            let standalone = std::mem::take(&mut self.prev);
            self.emit(standalone);
        }

        self.prev.clear();
        self.prev.push_str(line);
        self.last_line.clear();
        self.last_line.push_str(line);
    }

    /// Emits the last physical line and returns all candidates in input order.
    pub fn finish(mut self) -> Vec<String> {
        let last = std::mem::take(&mut self.last_line);
        self.emit(last);
        self.candidates
    }

    fn emit(&mut self, candidate: String) {
        debug!("Candidate line: {:?}", candidate);
        self.candidates.push(candidate);
    }
}

/// Splits extracted text on `\n` and stitches it into candidate lines.
pub fn preprocess(text: &str) -> Vec<String> {
    let mut stitcher = LineStitcher::new();
    for line in text.split('\n') {
        stitcher.push(line);
    }
    stitcher.finish()
}
