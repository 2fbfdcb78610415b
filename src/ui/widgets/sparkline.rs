//! Mini sparkline widget for inline trend lines

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const BAR_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A compact single-line sparkline
pub struct MiniSparkline<'a> {
    data: &'a [u64],
    style: Style,
}

impl<'a> MiniSparkline<'a> {
    pub fn new(data: &'a [u64]) -> Self {
        Self {
            data,
            style: Style::default().fg(Color::Cyan),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl<'a> Widget for MiniSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.data.is_empty() {
            return;
        }

        let text = sparkline_text(self.data, area.width as usize);
        for (i, ch) in text.chars().enumerate() {
            let x = area.x + i as u16;
            if x >= area.x + area.width {
                break;
            }
            buf.get_mut(x, area.y).set_char(ch).set_style(self.style);
        }
    }
}

/// Format sparkline data as inline text (for status messages)
pub fn sparkline_text(data: &[u64], width: usize) -> String {
    if data.is_empty() || width == 0 {
        return String::new();
    }

    let max = data.iter().copied().max().unwrap_or(1).max(1);

    // Take the last N values that fit in the width
    let start = data.len().saturating_sub(width);
    data[start..]
        .iter()
        .map(|&value| {
            let scaled = ((value as f64 / max as f64) * 7.0).round() as usize;
            BAR_CHARS[scaled.min(7)]
        })
        .collect()
}
