//! Presentation-only state: input box, focus, sidebar cursor and scrolling.
//!
//! Everything here is owned by the event loop and never leaves the UI layer;
//! the domain state lives in [`crate::core::app::App`].

use tui_textarea::TextArea;

use crate::ui::sidebar::SidebarItem;

const TOKEN_MASK: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

pub struct ViewState {
    pub textarea: TextArea<'static>,
    pub focus: Focus,
    pub sidebar_index: usize,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    /// Largest valid scroll offset as of the last frame.
    pub max_scroll: u16,
    masked: bool,
}

impl ViewState {
    /// `masked` turns the input box into a hidden token field.
    pub fn new(masked: bool) -> Self {
        Self {
            textarea: build_textarea(Vec::new(), masked),
            focus: Focus::Input,
            sidebar_index: 0,
            scroll_offset: 0,
            auto_scroll: true,
            max_scroll: 0,
            masked,
        }
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Keep the input mode in line with whether a credential exists.
    pub fn sync_mask(&mut self, has_credential: bool) {
        let masked = !has_credential;
        if masked != self.masked {
            self.masked = masked;
            self.textarea = build_textarea(Vec::new(), masked);
        }
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn take_input(&mut self) -> String {
        let text = self.input_text();
        self.textarea = build_textarea(Vec::new(), self.masked);
        text
    }

    pub fn set_input(&mut self, text: &str) {
        let lines = text.lines().map(str::to_string).collect();
        self.textarea = build_textarea(lines, self.masked);
        self.textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Sidebar,
            Focus::Sidebar => Focus::Input,
        };
    }

    pub fn selected_item(&self) -> SidebarItem {
        SidebarItem::ALL[self.sidebar_index % SidebarItem::ALL.len()]
    }

    pub fn select_next(&mut self) {
        self.sidebar_index = (self.sidebar_index + 1) % SidebarItem::ALL.len();
    }

    pub fn select_previous(&mut self) {
        let len = SidebarItem::ALL.len();
        self.sidebar_index = (self.sidebar_index + len - 1) % len;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(self.max_scroll);
        if self.scroll_offset >= self.max_scroll {
            self.auto_scroll = true;
        }
    }
}

fn build_textarea(lines: Vec<String>, masked: bool) -> TextArea<'static> {
    let mut textarea = if lines.is_empty() {
        TextArea::default()
    } else {
        TextArea::new(lines)
    };
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    if masked {
        textarea.set_mask_char(TOKEN_MASK);
        textarea.set_placeholder_text("Paste your Replicate API token (r8_...)");
    } else {
        textarea.set_placeholder_text("What do you need a slogan for?");
    }
    textarea
}
