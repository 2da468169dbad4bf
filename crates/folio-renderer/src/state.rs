//! Context tracked while walking markdown events.

use pulldown_cmark::Alignment;

/// Fenced or indented code block being collected.
#[derive(Debug, Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Table being rendered.
#[derive(Debug, Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Inline style for the current cell's alignment.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Image whose alt text is being collected.
#[derive(Debug, Default)]
pub(crate) struct ImageState {
    pending: Option<(String, String)>,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self, src: String, title: String) {
        self.pending = Some((src, title));
        self.alt_text.clear();
    }

    /// End capture and return (src, title, alt).
    pub(crate) fn end(&mut self) -> Option<(String, String, String)> {
        let (src, title) = self.pending.take()?;
        Some((src, title, std::mem::take(&mut self.alt_text)))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_state() {
        let mut code = CodeBlockState::default();
        assert!(!code.is_active());
        code.start(Some("rust".to_owned()));
        code.push_str("fn main() {}\n");
        assert!(code.is_active());
        assert_eq!(
            code.end(),
            (Some("rust".to_owned()), "fn main() {}\n".to_owned())
        );
        assert!(!code.is_active());
    }

    #[test]
    fn test_table_alignment() {
        let mut table = TableState::default();
        table.start(vec![Alignment::None, Alignment::Center]);
        table.start_row();
        assert_eq!(table.current_alignment_style(), "");
        table.next_cell();
        assert_eq!(table.current_alignment_style(), r#" style="text-align:center""#);
        table.next_cell();
        assert_eq!(table.current_alignment_style(), "");
    }

    #[test]
    fn test_image_state() {
        let mut image = ImageState::default();
        assert!(image.end().is_none());
        image.start("a.png".to_owned(), String::new());
        image.push_str("Alt");
        assert!(image.is_active());
        assert_eq!(
            image.end(),
            Some(("a.png".to_owned(), String::new(), "Alt".to_owned()))
        );
        assert!(!image.is_active());
    }
}
