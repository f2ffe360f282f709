use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Split spans into alternating runs of whitespace and non-whitespace.
fn pieces<'a>(line: &'a Line<'_>) -> Vec<(&'a str, Style)> {
    let mut out = Vec::new();
    for span in &line.spans {
        let text = span.content.as_ref();
        let mut start = 0;
        let mut in_space = None;
        for (index, ch) in text.char_indices() {
            let space = ch.is_whitespace();
            if in_space.is_some_and(|previous| previous != space) {
                out.push((&text[start..index], span.style));
                start = index;
            }
            in_space = Some(space);
        }
        if start < text.len() {
            out.push((&text[start..], span.style));
        }
    }
    out
}

/// Wrap a styled line to `width` columns at word boundaries, keeping span
/// styles. Words wider than a row are split across rows. Always returns at
/// least one row.
pub(crate) fn wrap_line(line: &Line<'_>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for (piece, style) in pieces(line) {
        let piece_width = piece.width();
        if current_width + piece_width <= width {
            current.push(Span::styled(piece.to_string(), style));
            current_width += piece_width;
            continue;
        }

        // Whitespace at a break point is dropped.
        if piece.starts_with(char::is_whitespace) {
            if !current.is_empty() {
                rows.push(Line::from(std::mem::take(&mut current)));
                current_width = 0;
            }
            continue;
        }

        if current_width > 0 {
            rows.push(Line::from(std::mem::take(&mut current)));
            current_width = 0;
        }

        let mut chunk = String::new();
        for ch in piece.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !chunk.is_empty() {
                current.push(Span::styled(std::mem::take(&mut chunk), style));
                rows.push(Line::from(std::mem::take(&mut current)));
                current_width = 0;
            }
            chunk.push(ch);
            current_width += ch_width;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
    }

    rows.push(Line::from(current));
    rows
}
