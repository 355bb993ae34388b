//! The editable output surface a workflow renders completions into.

/// Soft character limit shown by the input and output counters.
pub const CHAR_LIMIT: usize = 2000;

/// Character counter for an input or output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub count: usize,
    pub limit_reached: bool,
}

impl CharCount {
    pub fn of(text: &str) -> Self {
        let count = text.chars().count();
        Self {
            count,
            limit_reached: count > CHAR_LIMIT,
        }
    }

    /// `"1 character"` / `"42 characters"`.
    pub fn label(&self) -> String {
        let plural = if self.count == 1 { "" } else { "s" };
        format!("{} character{plural}", self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    /// Sentinel meaning nothing has been generated yet.
    Placeholder,
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSurface {
    content: Content,
    placeholder: String,
    editable: bool,
    focused: bool,
}

impl OutputSurface {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            content: Content::Placeholder,
            placeholder: placeholder.into(),
            editable: false,
            focused: false,
        }
    }

    /// Visible text, which is the placeholder when nothing was generated.
    pub fn text(&self) -> &str {
        match &self.content {
            Content::Placeholder => &self.placeholder,
            Content::Text(text) => text,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.content == Content::Placeholder
    }

    /// Real, non-blank output. Drives copy/save/re-submit enablement.
    pub fn has_content(&self) -> bool {
        matches!(&self.content, Content::Text(text) if !text.trim().is_empty())
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Empty, read-only surface shown while a request is in flight.
    pub fn clear(&mut self) {
        self.content = Content::Text(String::new());
        self.editable = false;
        self.focused = false;
    }

    /// Show a completion, make it editable and focus it.
    pub fn render(&mut self, text: &str) {
        self.content = Content::Text(text.to_string());
        self.editable = true;
        self.focused = true;
    }

    /// Apply a user edit. Ignored unless the surface is editable.
    pub fn edit(&mut self, text: &str) -> bool {
        if !self.editable {
            return false;
        }
        self.content = Content::Text(text.to_string());
        true
    }

    /// Markup for display: HTML-escaped, newlines as `<br>`.
    pub fn markup(&self) -> String {
        to_markup(self.text())
    }

    pub fn char_count(&self) -> CharCount {
        match &self.content {
            Content::Placeholder => CharCount::of(""),
            Content::Text(text) => CharCount::of(text.trim()),
        }
    }
}

/// Escape `text` for HTML and turn line breaks (`\n`, `\r\n` or a bare
/// `\r`) into `<br>`.
pub fn to_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' => out.push_str("<br>"),
            other => out.push(other),
        }
    }
    out
}
