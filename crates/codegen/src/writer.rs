//! Indentation-aware source buffer

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub(crate) struct SourceWriter {
    buf: String,
    depth: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current depth
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref().trim_end();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    /// Separator line; never doubled and never at the top of the file
    pub fn blank(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
    }

    /// `header {` and one level deeper
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Re-indent a multi-line block to the current depth, keeping its own
    /// relative indentation.
    pub fn block(&mut self, code: &str) {
        for line in code.lines() {
            self.line(line);
        }
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
