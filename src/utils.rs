use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shortens `s` to at most `max_width` display columns, ending in `...` when cut.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str("...");
    out
}

/// Number of terminal rows `text` occupies when wrapped at `max_width` columns.
/// Breaks on explicit newlines and at the column limit.
pub fn wrapped_height(text: &str, max_width: usize) -> usize {
    if max_width == 0 {
        return 0;
    }

    text.split('\n')
        .map(|line| {
            let mut rows = 1;
            let mut width = 0;
            for ch in line.chars() {
                let w = ch.width().unwrap_or(0);
                if width + w > max_width && width > 0 {
                    rows += 1;
                    width = 0;
                }
                width += w;
            }
            rows
        })
        .sum()
}
