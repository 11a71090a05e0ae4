/// Character columns per display line.
pub const LCD_COLUMNS: usize = 16;

/// Contents of the two-line character display. Longer text is cut at the
/// last column, the way the controller chip drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdLines {
    pub line1: String,
    pub line2: String,
}

impl LcdLines {
    pub fn new(line1: &str, line2: &str) -> Self {
        LcdLines {
            line1: line1.chars().take(LCD_COLUMNS).collect(),
            line2: line2.chars().take(LCD_COLUMNS).collect(),
        }
    }
}
