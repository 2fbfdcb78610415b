use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod widgets;

use crate::app::{App, Focus, InputMode, PromptKind, RowFilter, StatusLevel};
use crate::domain::advisory::{band_of, publications_per_day, SeverityBand};
use widgets::severity_chart::SeverityChart;
use widgets::sparkline::MiniSparkline;

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = layout::areas(f.size(), app.sidebar_collapsed);

    draw_header(f, areas.header, app);
    if app.sidebar_collapsed {
        draw_collapsed_sidebar(f, areas.sidebar);
    } else {
        draw_sources_panel(f, areas.sidebar_sources, app);
        draw_ioc_panel(f, areas.sidebar_iocs, app);
        draw_stats_panel(f, areas.sidebar_stats, app);
    }
    draw_chart_panel(f, areas.chart, app);
    draw_feed_panel(f, areas.list, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.detail_row.is_some() {
        draw_detail_modal(f, areas.size, app);
    }
    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let toggle = if app.sidebar_collapsed { "[»]" } else { "[«]" };
    let left = Line::from(vec![
        Span::styled(toggle, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(
            "VIGIL",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" — threat advisory feed", Style::default().fg(Color::Gray)),
    ]);
    let left_block = Paragraph::new(left).block(Block::default().borders(Borders::ALL));
    f.render_widget(left_block, chunks[0]);

    let endpoint = if app.api_endpoint.is_empty() {
        "offline".to_string()
    } else {
        app.api_endpoint.clone()
    };
    let mut right_spans = vec![
        Span::styled(
            format!("{} advisories", app.visible_count()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
    ];
    if let Some(desc) = app.row_filter.describe() {
        right_spans.push(Span::styled(
            format!("[{desc}]  "),
            Style::default().fg(Color::Yellow),
        ));
    }
    right_spans.push(Span::styled(endpoint, Style::default().fg(Color::DarkGray)));
    let right_block = Paragraph::new(Line::from(right_spans))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(right_block, chunks[1]);
}

fn draw_collapsed_sidebar(f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let paragraph = Paragraph::new("»").block(block);
    f.render_widget(paragraph, area);
}

fn draw_sources_panel(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Sidebar;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let items: Vec<ListItem> = app
        .source_counts
        .iter()
        .enumerate()
        .map(|(idx, (source, count))| {
            let selected = app.selected_source == Some(idx);
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{}: {}", source, count),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!("Sources ({})", app.source_counts.len()))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(list, area);
}

fn draw_ioc_panel(f: &mut Frame, area: Rect, app: &App) {
    let active = matches!(app.row_filter, RowFilter::Ioc(_));
    let border_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let items: Vec<ListItem> = app
        .ioc_suggestions
        .iter()
        .map(|ioc| {
            ListItem::new(Line::from(Span::styled(
                ioc.clone(),
                Style::default().fg(Color::LightMagenta),
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!("IOCs ({})", app.ioc_suggestions.len()))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(list, area);
}

fn draw_stats_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title("Feed")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let alert_count = app.alert_count();
    let alert_style = if alert_count > 0 {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::Green)
    };
    let alert_line = Paragraph::new(Line::from(vec![
        Span::styled("Alerts ", Style::default().fg(Color::DarkGray)),
        Span::styled(alert_count.to_string(), alert_style),
    ]));
    f.render_widget(
        alert_line,
        Rect {
            height: 1,
            ..inner
        },
    );

    if inner.height > 1 {
        let today = chrono::Local::now().date_naive();
        let per_day = publications_per_day(&app.rows, 14, today);
        let spark_area = Rect {
            y: inner.y + 1,
            height: 1,
            ..inner
        };
        f.render_widget(MiniSparkline::new(&per_day), spark_area);
    }
}

fn draw_chart_panel(f: &mut Frame, area: Rect, app: &App) {
    let filtered = matches!(app.row_filter, RowFilter::Severity(_));
    let border_style = if filtered {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title("Severity (click to filter)")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let counts = app.chart_counts();
    let labels = app.chart_labels();
    let chart = SeverityChart::new(&counts, &labels).highlight(app.chart_highlight());
    f.render_widget(chart, inner);
}

fn draw_feed_panel(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Feed;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!("Feed ({})", app.visible_count()))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = app.visible_indices();
    if visible.is_empty() {
        let empty = if app.rows.is_empty() {
            "No advisories loaded yet"
        } else {
            "No rows match the active filter"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            empty,
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(paragraph, inner);
        return;
    }

    let height = inner.height.max(1) as usize;
    let offset = app.list_offset(height);

    let items: Vec<ListItem> = visible
        .iter()
        .skip(offset)
        .take(height)
        .enumerate()
        .filter_map(|(i, row_idx)| {
            let advisory = app.rows.get(*row_idx)?;
            let selected = offset + i == app.selected_row;
            let band = band_of(&advisory.severity);
            let sev_style = Style::default().fg(severity_color(band));

            let mut spans = vec![
                Span::styled(format!("{:<9}", band.label()), sev_style),
                Span::styled(
                    format!("{:<12}", truncate_str(&advisory.source, 11)),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(truncate_str(&advisory.title, 70)),
            ];
            if !advisory.iocs.is_empty() {
                spans.push(Span::styled(
                    format!("  ({} IOCs)", advisory.iocs.len()),
                    Style::default().fg(Color::LightMagenta),
                ));
            }

            let mut line_style = Style::default();
            if selected {
                line_style = line_style.bg(Color::Rgb(40, 40, 40)).add_modifier(Modifier::BOLD);
            }
            Some(ListItem::new(Line::from(spans)).style(line_style))
        })
        .collect();

    let list = List::new(items);
    f.render_widget(list, inner);
}

fn severity_color(band: SeverityBand) -> Color {
    match band {
        SeverityBand::Critical => Color::Red,
        SeverityBand::High => Color::LightRed,
        SeverityBand::Medium => Color::Yellow,
        SeverityBand::Low => Color::Green,
        SeverityBand::Unknown => Color::DarkGray,
    }
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("Rows ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}/{}  ", app.visible_count(), app.rows.len())),
        Span::styled("Alerts ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.alert_count())),
    ];
    if let Some(desc) = app.row_filter.describe() {
        spans.push(Span::styled("Filter ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(format!("{desc}  ")));
    }
    if let Some(error) = app.last_fetch_error.as_deref() {
        spans.push(Span::styled(
            truncate_str(error, 48),
            Style::default().fg(Color::LightRed),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => Line::from(vec![
            Span::styled(": ", Style::default().fg(Color::Yellow)),
            Span::raw(app.command.input.clone()),
            Span::styled(
                "  filter | ioc | sev | source | clear | refresh | export | alerts | stats",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Prompt(PromptKind::Search) => Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::LightCyan)),
            Span::raw(app.command.input.clone()),
            Span::styled(
                "  (live text filter, Enter=keep Esc=done)",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Prompt(PromptKind::Ioc) => Line::from(vec![
            Span::styled("ioc> ", Style::default().fg(Color::LightMagenta)),
            Span::raw(app.command.input.clone()),
            Span::styled(
                "  (live IOC filter, Enter=keep Esc=done)",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text.to_string(), Style::default().fg(color)),
                ])
            } else {
                Line::from(Span::styled(
                    "/ search  i ioc  : command  b sidebar  Enter detail  r refresh  e export  ? help  q quit",
                    Style::default().fg(Color::DarkGray),
                ))
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn draw_detail_modal(f: &mut Frame, area: Rect, app: &App) {
    let Some(advisory) = app.detail_advisory() else {
        return;
    };

    let popup_area = centered_rect(70, 64, area);
    f.render_widget(Clear, popup_area);

    let band = band_of(&advisory.severity);
    let ioc_line = advisory.ioc_line();

    let mut lines = vec![
        Line::from(Span::styled(
            advisory.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Source    ", Style::default().fg(Color::DarkGray)),
            Span::raw(advisory.source.clone()),
        ]),
        Line::from(vec![
            Span::styled("Severity  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                advisory.severity.clone(),
                Style::default().fg(severity_color(band)),
            ),
        ]),
    ];
    if !advisory.published.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Published ", Style::default().fg(Color::DarkGray)),
            Span::raw(advisory.published.clone()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(advisory.description.clone()));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        ioc_line,
        Style::default().fg(Color::LightMagenta),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc closes",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Advisory").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(64, 60, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  j / k      Move selection"),
        Line::from("  g / G      Top / bottom"),
        Line::from("  Ctrl-u/d   Half page up/down"),
        Line::from("  Tab        Toggle focus sidebar/feed"),
        Line::from("  Enter      Open advisory detail"),
        Line::from("  Esc        Close detail / clear filter"),
        Line::from("  Mouse      Click rows, chart bars, sources"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  /          Live text filter"),
        Line::from("  i          Live IOC filter"),
        Line::from("  :          Command line"),
        Line::from("  b          Toggle sidebar"),
        Line::from("  [ / ]      Switch API endpoint"),
        Line::from("  r          Refresh feed"),
        Line::from("  e          Export feed to CSV"),
        Line::from("  y          Copy selected IOCs"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from("Command examples:"),
        Line::from("  :sev High      :source CISA KEV"),
        Line::from("  :ioc 1.1.1.1   :export json"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup_area);
}

fn truncate_str(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let truncated: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
