use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the sidebar strip when collapsed.
pub const COLLAPSED_SIDEBAR_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub sidebar_toggle: Rect,
    pub main: Rect,
    pub footer: Rect,
    pub sidebar: Rect,
    pub sidebar_sources: Rect,
    pub sidebar_iocs: Rect,
    pub sidebar_stats: Rect,
    pub chart: Rect,
    pub list: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect, sidebar_collapsed: bool) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    let sidebar_constraint = if sidebar_collapsed {
        Constraint::Length(COLLAPSED_SIDEBAR_WIDTH)
    } else {
        Constraint::Percentage(26)
    };
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([sidebar_constraint, Constraint::Min(0)])
        .split(vertical[1]);

    let (sidebar_sources, sidebar_iocs, sidebar_stats) = if sidebar_collapsed {
        (main_chunks[0], Rect::default(), Rect::default())
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),
                Constraint::Length(9),
                Constraint::Length(4),
            ])
            .split(main_chunks[0]);
        (chunks[0], chunks[1], chunks[2])
    };

    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(main_chunks[1]);

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(vertical[2]);

    // The toggle glyph sits at the head of the header bar.
    let sidebar_toggle = Rect {
        x: vertical[0].x,
        y: vertical[0].y,
        width: 4.min(vertical[0].width),
        height: vertical[0].height,
    };

    UiAreas {
        size,
        header: vertical[0],
        sidebar_toggle,
        main: vertical[1],
        footer: vertical[2],
        sidebar: main_chunks[0],
        sidebar_sources,
        sidebar_iocs,
        sidebar_stats,
        chart: content_chunks[0],
        list: content_chunks[1],
        status_line: footer_chunks[0],
        command_line: footer_chunks[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_sidebar_is_narrow() {
        let size = Rect {
            x: 0,
            y: 0,
            width: 120,
            height: 40,
        };
        let expanded = areas(size, false);
        let collapsed = areas(size, true);
        assert!(expanded.sidebar.width > collapsed.sidebar.width);
        assert_eq!(collapsed.sidebar.width, COLLAPSED_SIDEBAR_WIDTH);
        assert_eq!(collapsed.sidebar_iocs.width, 0);
    }

    #[test]
    fn test_toggle_overlaps_header_head() {
        let size = Rect {
            x: 0,
            y: 0,
            width: 120,
            height: 40,
        };
        let areas = areas(size, false);
        assert_eq!(areas.sidebar_toggle.x, areas.header.x);
        assert_eq!(areas.sidebar_toggle.y, areas.header.y);
        assert!(areas.sidebar_toggle.width <= areas.header.width);
    }
}
