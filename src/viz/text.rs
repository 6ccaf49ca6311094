//! Text measurement and truncation (plotters has no text metrics without a loaded font).

/// Heuristic: estimate pixel width of text.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    // 0.6 em per character
    (text.chars().count() as u32 * font_px * 3).div_ceil(5)
}

/// Truncate to fit `max_px`, ending in a single ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        let candidate = format!("{out}{ch}…");
        if estimate_text_width_px(&candidate, font_px) > max_px {
            break;
        }
        out.push(ch);
    }
    if out.is_empty() {
        return String::new();
    }
    out.push('…');
    out
}
