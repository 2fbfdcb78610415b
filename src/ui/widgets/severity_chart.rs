//! Severity bar chart with mouse hit-testing
//!
//! Renders one vertical bar per severity band. Clicks resolve to the
//! nearest bar through `hit_test`, which shares the slot geometry with the
//! renderer so what you click is what you filter.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

pub struct SeverityChart<'a> {
    counts: &'a [u64],
    labels: &'a [&'static str],
    highlight: Option<usize>,
}

impl<'a> SeverityChart<'a> {
    pub fn new(counts: &'a [u64], labels: &'a [&'static str]) -> Self {
        Self {
            counts,
            labels,
            highlight: None,
        }
    }

    /// Emphasize the bar whose label drives the active severity filter.
    pub fn highlight(mut self, index: Option<usize>) -> Self {
        self.highlight = index;
        self
    }

    fn bar_color(label: &str) -> Color {
        match label {
            "Critical" => Color::Red,
            "High" => Color::LightRed,
            "Medium" => Color::Yellow,
            "Low" => Color::Green,
            _ => Color::DarkGray,
        }
    }
}

impl<'a> Widget for SeverityChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bars = self.counts.len().min(self.labels.len());
        if bars == 0 || area.width == 0 || area.height < 2 {
            return;
        }

        let slot_w = slot_width(area.width, bars);
        let max = self.counts.iter().copied().max().unwrap_or(0).max(1);
        let bar_height = area.height - 1;
        let label_y = area.y + area.height - 1;

        for (i, &count) in self.counts.iter().take(bars).enumerate() {
            let x0 = area.x + (i as u16) * slot_w;
            let color = Self::bar_color(self.labels[i]);
            let style = if self.highlight == Some(i) {
                Style::default().fg(color).bg(Color::DarkGray)
            } else {
                Style::default().fg(color)
            };

            // Scale to at least one cell when the band is non-empty.
            let mut filled = ((count as f64 / max as f64) * bar_height as f64).round() as u16;
            if count > 0 {
                filled = filled.max(1);
            }

            let fill_w = slot_w.saturating_sub(1).max(1);
            for dy in 0..filled.min(bar_height) {
                let y = area.y + bar_height - 1 - dy;
                for dx in 0..fill_w {
                    let x = x0 + dx;
                    if x < area.x + area.width {
                        buf.get_mut(x, y).set_char('█').set_style(style);
                    }
                }
            }

            let caption = format!("{} {}", self.labels[i], count);
            for (j, ch) in caption.chars().enumerate() {
                let x = x0 + j as u16;
                if x >= area.x + area.width || j as u16 >= slot_w {
                    break;
                }
                buf.get_mut(x, label_y).set_char(ch).set_style(style);
            }
        }
    }
}

fn slot_width(width: u16, bars: usize) -> u16 {
    (width / bars as u16).max(1)
}

/// Resolve a click column to the nearest bar index.
pub fn hit_test(area: Rect, bars: usize, col: u16, row: u16) -> Option<usize> {
    if bars == 0 || area.width == 0 || area.height == 0 {
        return None;
    }
    if col < area.x
        || col >= area.x.saturating_add(area.width)
        || row < area.y
        || row >= area.y.saturating_add(area.height)
    {
        return None;
    }
    let slot_w = slot_width(area.width, bars);
    let index = ((col - area.x) / slot_w) as usize;
    Some(index.min(bars - 1))
}
