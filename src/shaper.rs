//! Arabic text preparation for visual display.
//!
//! Engines consume raw text; this is only for surfaces that draw Arabic
//! without their own shaping support.

use unicode_bidi::BidiInfo;

/// Reshape Arabic letters into their contextual presentation forms and
/// reorder the result for left-to-right display.
///
/// Text without right-to-left characters comes back unchanged.
pub fn shape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let reshaped = ar_reshaper::reshape_line(text);
    let bidi = BidiInfo::new(&reshaped, None);
    if !bidi.has_rtl() {
        return reshaped;
    }

    let mut display = String::with_capacity(reshaped.len());
    for para in &bidi.paragraphs {
        display.push_str(&bidi.reorder_line(para, para.range.clone()));
    }
    display
}
