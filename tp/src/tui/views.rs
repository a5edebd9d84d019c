//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the UI from
//! AppState and never touches domain state. The one write is reporting the
//! map's drawable area, which moves the map out of its placeholder phase.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use tracing::trace;

use super::state::{AppState, CHAT_PLACEHOLDER, DESTINATION_PLACEHOLDER, Focus, InteractionMode};
use crate::chat::ChatRole;
use crate::domain::GeoPoint;
use crate::map::{DEFAULT_CENTER, DEFAULT_ZOOM, MapScene, MarkerKind, Viewport};
use crate::presenter::{ItineraryTab, LegacyView, Presentation, StructuredView};

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const FOCUS: Color = Color::Rgb(0, 191, 255); // Deep sky blue
    pub const DIM: Color = Color::DarkGray;
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const LOADING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const READY: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const RATING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const BADGE: Color = Color::Rgb(100, 149, 237); // Cornflower blue
    pub const CUISINE: Color = Color::Rgb(255, 165, 0); // Orange

    // Map
    pub const ATTRACTION_BG: Color = Color::Rgb(220, 38, 38); // Red badge
    pub const RESTAURANT: Color = Color::Rgb(205, 133, 63); // Peru, drawn dim
    pub const ROUTE: Color = Color::Rgb(59, 130, 246); // Blue
    pub const GRID: Color = Color::Rgb(60, 60, 60);
    pub const SELECTED: Color = Color::Rgb(255, 255, 0);

    // Chat
    pub const CHAT_USER: Color = Color::Rgb(0, 255, 127); // Green
}

/// Dash pieces per route segment; every other piece is drawn
const ROUTE_DASHES: usize = 16;

/// Main render function
pub fn render(state: &mut AppState, frame: &mut Frame) {
    trace!(focus = ?state.focus, loading = state.loading, "render: called");
    let error_height = u16::from(state.error_message.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Header
            Constraint::Length(3),            // Destination input
            Constraint::Length(error_height), // Inline error
            Constraint::Min(0),               // Results
            Constraint::Length(1),            // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);
    render_destination_input(state, frame, chunks[1]);
    if let Some(error) = &state.error_message {
        let line = Line::from(Span::styled(format!(" {}", error), Style::default().fg(colors::ERROR)));
        frame.render_widget(Paragraph::new(line), chunks[2]);
    }
    render_body(state, frame, chunks[3]);
    render_footer(state, frame, chunks[4]);

    if state.interaction_mode == InteractionMode::Help {
        render_help_overlay(frame, frame.area());
    }
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { colors::FOCUS } else { colors::DIM };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ))
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_header: called");
    let destination = state.active_destination.as_deref().unwrap_or_default();
    let status = if state.loading {
        Span::styled(format!("Planning trip to {}...", destination), Style::default().fg(colors::LOADING))
    } else if state.error_message.is_some() {
        Span::styled("Request failed", Style::default().fg(colors::ERROR))
    } else if state.result.is_some() {
        Span::styled(destination.to_string(), Style::default().fg(colors::READY))
    } else {
        Span::styled("Plan Your Perfect Trip", Style::default().fg(colors::DIM))
    };

    let header = Line::from(vec![
        Span::styled(
            " ✈ Trip Planner ",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        status,
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_destination_input(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_destination_input: called");
    let focused = state.focus == Focus::Destination;
    let action = if state.loading {
        Span::styled(" Planning... ", Style::default().fg(colors::LOADING))
    } else if state.can_submit() {
        Span::styled(" [Enter] Go ", Style::default().fg(colors::READY).add_modifier(Modifier::BOLD))
    } else {
        Span::styled(" [Enter] Go ", Style::default().fg(colors::DIM))
    };
    let block = focus_block("Destination", focused).title_top(Line::from(action).right_aligned());

    let content = if state.destination_input.is_empty() {
        Line::from(Span::styled(DESTINATION_PLACEHOLDER, Style::default().fg(colors::DIM)))
    } else if state.loading {
        Line::from(Span::styled(state.destination_input.as_str(), Style::default().fg(colors::DIM)))
    } else {
        Line::from(state.destination_input.as_str())
    };

    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(content).block(block), area);
    if focused && !state.loading {
        let x = inner.x + (state.destination_input.chars().count() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

fn render_body(state: &mut AppState, frame: &mut Frame, area: Rect) {
    trace!("render_body: called");
    if state.presentation.is_none() {
        render_welcome(state, frame, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    render_itinerary(state, frame, columns[0]);

    if state.chat_open {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);
        render_map(state, frame, rows[0]);
        render_chat(state, frame, rows[1]);
    } else {
        render_map(state, frame, columns[1]);
    }
}

fn render_welcome(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_welcome: called");
    let lines = if state.loading {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Planning your trip to {}...",
                    state.active_destination.as_deref().unwrap_or_default()
                ),
                Style::default().fg(colors::LOADING).add_modifier(Modifier::BOLD),
            ))
            .centered(),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Plan Your ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    "Perfect Trip",
                    Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
                ),
            ])
            .centered(),
            Line::from(""),
            Line::from("AI-powered itineraries, real-time weather, and optimized routes.").centered(),
            Line::from("Just type a city and let us handle the rest.").centered(),
        ]
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

// === Itinerary ===

fn render_itinerary(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(tab = ?state.active_tab, "render_itinerary: called");
    let focused = state.focus == Focus::Itinerary;
    match &state.presentation {
        Some(Presentation::Structured(view)) => render_structured(state, view, focused, frame, area),
        Some(Presentation::Legacy(view)) => {
            let block = focus_block("Itinerary", focused);
            let paragraph = Paragraph::new(legacy_lines(view))
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((state.legacy_scroll, 0));
            frame.render_widget(paragraph, area);
        }
        None => {}
    }
}

fn render_structured(state: &AppState, view: &StructuredView, focused: bool, frame: &mut Frame, area: Rect) {
    let block = focus_block(&view.title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut summary_lines: Vec<Line> = Vec::new();
    if let Some(weather) = &view.weather {
        summary_lines.push(Line::from(vec![
            Span::styled("☁ ", Style::default().fg(colors::BADGE)),
            Span::styled(
                format!("{}°C", weather.temperature),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  wind {} km/h  ", weather.wind)),
            Span::styled(
                format!("Today {}° / {}°", weather.today_high, weather.today_low),
                Style::default().fg(colors::DIM),
            ),
        ]));
    }
    if let Some(summary) = &view.summary {
        summary_lines.push(Line::from(Span::styled(
            summary.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    let width = inner.width.max(1) as usize;
    let summary_height: u16 = summary_lines
        .iter()
        .map(|l| l.width().div_ceil(width).max(1) as u16)
        .sum::<u16>()
        .min(inner.height / 2);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(summary_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(summary_lines).wrap(Wrap { trim: true }), rows[0]);

    let tabs = Tabs::new(ItineraryTab::ALL.iter().map(|t| t.title()))
        .select(state.active_tab.index())
        .style(Style::default().fg(colors::DIM))
        .highlight_style(Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, rows[1]);

    let lines = match state.active_tab {
        ItineraryTab::Attractions => attraction_lines(view),
        ItineraryTab::Dining => dining_lines(view),
        ItineraryTab::Plan => plan_lines(view),
    };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.itinerary_scroll(), 0));
    frame.render_widget(paragraph, rows[2]);
}

fn empty_line(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(colors::DIM)))
}

fn attraction_lines(view: &StructuredView) -> Vec<Line<'_>> {
    if view.attractions.is_empty() {
        return vec![empty_line("No attractions listed.")];
    }
    let mut lines = Vec::new();
    for row in &view.attractions {
        let mut spans = Vec::new();
        if let Some(order) = &row.visit_order {
            spans.push(Span::styled(
                format!("({}) ", order),
                Style::default().fg(colors::BADGE).add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::styled(row.name.as_str(), Style::default().add_modifier(Modifier::BOLD)));
        if let Some(rating) = &row.rating {
            spans.push(Span::styled(format!("  ★ {}", rating), Style::default().fg(colors::RATING)));
        }
        lines.push(Line::from(spans));
        if !row.description.is_empty() {
            lines.push(Line::from(format!("  {}", row.description)));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn dining_lines(view: &StructuredView) -> Vec<Line<'_>> {
    if view.dining.is_empty() {
        return vec![empty_line("No dining suggestions.")];
    }
    let mut lines = Vec::new();
    for row in &view.dining {
        let mut spans = vec![
            Span::styled("🍽 ", Style::default().fg(colors::CUISINE)),
            Span::styled(row.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ];
        if let Some(cuisine) = &row.cuisine {
            spans.push(Span::styled(format!("  [{}]", cuisine), Style::default().fg(colors::CUISINE)));
        }
        if let Some(rating) = &row.rating {
            spans.push(Span::styled(format!("  ★ {}", rating), Style::default().fg(colors::RATING)));
        }
        lines.push(Line::from(spans));
        if !row.description.is_empty() {
            lines.push(Line::from(format!("  {}", row.description)));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn plan_lines(view: &StructuredView) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Estimated Costs",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("  Transport: "),
            Span::styled(view.costs.transport.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw("  Total Estimate: "),
            Span::styled(view.costs.total.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];
    for day in &view.days {
        lines.push(Line::from(Span::styled(
            day.label.as_str(),
            Style::default().fg(colors::BADGE).add_modifier(Modifier::BOLD),
        )));
        for activity in &day.activities {
            lines.push(Line::from(format!("  • {}", activity)));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
    ))
}

fn legacy_lines(view: &LegacyView) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    if let Some(weather) = &view.weather {
        lines.push(section("Current Weather"));
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}°C", weather.temperature),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  wind {} km/h", weather.wind)),
        ]));
        if !weather.forecast.is_empty() {
            let forecast: Vec<String> = weather.forecast.iter().map(|(day, high)| format!("{} {}°", day, high)).collect();
            lines.push(Line::from(Span::styled(
                format!("  {}", forecast.join("   ")),
                Style::default().fg(colors::DIM),
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(section("AI Travel Plan"));
    // Every line break in the narrative is kept; CRLF counts as one break
    lines.extend(view.narrative.lines().map(Line::raw));
    lines.push(Line::from(""));

    if !view.attractions.is_empty() {
        lines.push(section("Top Attractions"));
        for row in &view.attractions {
            lines.push(Line::from(Span::styled(
                format!("  {}", row.name),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if !row.address.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", row.address),
                    Style::default().fg(colors::DIM),
                )));
            }
            if !row.categories.is_empty() {
                let tags: Vec<String> = row.categories.iter().map(|c| format!("[{}]", c)).collect();
                lines.push(Line::from(format!("    {}", tags.join(" "))));
            }
        }
        lines.push(Line::from(""));
    }

    if !view.restaurants.is_empty() {
        lines.push(section("Nearby Dining"));
        for row in &view.restaurants {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", row.name), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  ★ {}", row.rating), Style::default().fg(colors::CUISINE)),
            ]));
            if !row.address.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", row.address),
                    Style::default().fg(colors::DIM),
                )));
            }
        }
        lines.push(Line::from(""));
    }

    if let Some(costs) = &view.costs {
        lines.push(section("Estimated Costs"));
        for (label, value) in costs {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}: ", label)),
                Span::styled(*value, Style::default().add_modifier(Modifier::BOLD)),
            ]));
        }
    }
    lines
}

// === Map ===

fn render_map(state: &mut AppState, frame: &mut Frame, area: Rect) {
    trace!("render_map: called");
    let block = focus_block("Interactive Map", state.focus == Focus::Map).title_bottom(
        Line::from(vec![
            Span::styled(" ● ", Style::default().fg(colors::ATTRACTION_BG)),
            Span::raw("attractions "),
            Span::styled("◆ ", Style::default().fg(colors::RESTAURANT)),
            Span::raw("dining "),
        ])
        .right_aligned(),
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !state.map.attach(inner.width, inner.height) {
        frame.render_widget(Paragraph::new(empty_line("Loading map...")), inner);
        return;
    }

    let viewport = state.map.viewport().unwrap_or(Viewport {
        center: DEFAULT_CENTER,
        zoom: DEFAULT_ZOOM,
    });
    let bounds = viewport.bounds(inner.width, inner.height);
    let selected = state.map.selected().cloned();

    let Some(scene) = state.map.scene() else {
        return;
    };

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds(bounds.x)
        .y_bounds(bounds.y)
        .paint(|ctx| {
            draw_base(ctx, viewport.center, bounds.x, bounds.y);
            ctx.layer();
            draw_route(ctx, scene);
            ctx.layer();
            for marker in &scene.restaurants {
                let mut style = Style::default().fg(colors::RESTAURANT).add_modifier(Modifier::DIM);
                if selected.as_ref() == Some(&marker.key) {
                    style = Style::default().fg(Color::Black).bg(colors::SELECTED);
                }
                ctx.print(marker.position.lon, marker.position.lat, Span::styled("◆", style));
            }
            for marker in &scene.attractions {
                let label = marker.label.map(|n| n.to_string()).unwrap_or_default();
                let style = if selected.as_ref() == Some(&marker.key) {
                    Style::default().fg(Color::Black).bg(colors::SELECTED).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White).bg(colors::ATTRACTION_BG).add_modifier(Modifier::BOLD)
                };
                ctx.print(marker.position.lon, marker.position.lat, Span::styled(label, style));
            }
        });
    frame.render_widget(canvas, inner);

    if let Some(marker) = state.map.selected_marker() {
        render_popup(marker.popup_lines(), marker.kind, frame, inner);
    }
}

/// Graticule and center cross
fn draw_base(ctx: &mut Context, center: GeoPoint, x: [f64; 2], y: [f64; 2]) {
    for i in 1..4 {
        let gx = x[0] + (x[1] - x[0]) * f64::from(i) / 4.0;
        let gy = y[0] + (y[1] - y[0]) * f64::from(i) / 4.0;
        ctx.draw(&CanvasLine::new(gx, y[0], gx, y[1], colors::GRID));
        ctx.draw(&CanvasLine::new(x[0], gy, x[1], gy, colors::GRID));
    }
    let dx = (x[1] - x[0]) / 60.0;
    let dy = (y[1] - y[0]) / 30.0;
    ctx.draw(&CanvasLine::new(center.lon - dx, center.lat, center.lon + dx, center.lat, colors::DIM));
    ctx.draw(&CanvasLine::new(center.lon, center.lat - dy, center.lon, center.lat + dy, colors::DIM));
}

/// Straight dashed segments between consecutive attractions
fn draw_route(ctx: &mut Context, scene: &MapScene) {
    for pair in scene.path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        for dash in (0..ROUTE_DASHES).step_by(2) {
            let t0 = dash as f64 / ROUTE_DASHES as f64;
            let t1 = (dash + 1) as f64 / ROUTE_DASHES as f64;
            ctx.draw(&CanvasLine::new(
                from.lon + (to.lon - from.lon) * t0,
                from.lat + (to.lat - from.lat) * t0,
                from.lon + (to.lon - from.lon) * t1,
                from.lat + (to.lat - from.lat) * t1,
                colors::ROUTE,
            ));
        }
    }
}

fn render_popup(lines: Vec<String>, kind: MarkerKind, frame: &mut Frame, area: Rect) {
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = u16::try_from(longest).unwrap_or(u16::MAX).saturating_add(4);
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = Rect {
        x: area.x.saturating_add(1),
        y: area.y + area.height.saturating_sub(height.saturating_add(1)),
        width: width.min(area.width.saturating_sub(2)),
        height: height.min(area.height),
    };
    let accent = match kind {
        MarkerKind::Attraction => colors::ATTRACTION_BG,
        MarkerKind::Restaurant => colors::RESTAURANT,
    };
    let text: Vec<Line> = lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| {
            if i == 0 {
                Line::from(Span::styled(l, Style::default().add_modifier(Modifier::BOLD)))
            } else {
                Line::from(l)
            }
        })
        .collect();
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent)),
        ),
        popup,
    );
}

// === Chat ===

fn render_chat(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(turns = state.chat_turns.len(), composing = state.chat_composing, "render_chat: called");
    let focused = state.focus == Focus::Chat;
    let block = focus_block("Trip Assistant", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let mut lines: Vec<Line> = Vec::new();
    for turn in &state.chat_turns {
        match turn.role {
            ChatRole::User => {
                for (i, text) in turn.text.lines().enumerate() {
                    let prefix = if i == 0 { "> " } else { "  " };
                    lines.push(Line::from(vec![
                        Span::styled(
                            prefix,
                            Style::default().fg(colors::CHAT_USER).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(text, Style::default().fg(colors::CHAT_USER)),
                    ]));
                }
            }
            ChatRole::Assistant => {
                let markdown = tui_markdown::from_str(&turn.text);
                for line in markdown.lines {
                    let mut spans = vec![Span::raw("  ")];
                    spans.extend(line.spans);
                    lines.push(Line::from(spans));
                }
            }
        }
        lines.push(Line::from(""));
    }
    if state.chat_composing {
        lines.push(Line::from(Span::styled(
            format!("  {}...", state.composing_word),
            Style::default().fg(colors::DIM).add_modifier(Modifier::ITALIC),
        )));
    }

    let width = rows[0].width.max(1) as usize;
    let total: usize = lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum();
    let bottom = total.saturating_sub(rows[0].height as usize);
    let offset = bottom.saturating_sub(state.chat_scroll as usize) as u16;
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((offset, 0)),
        rows[0],
    );

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "─".repeat(rows[1].width as usize),
            Style::default().fg(colors::DIM),
        ))),
        rows[1],
    );

    let input = if state.chat_input.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(colors::CHAT_USER)),
            Span::styled(CHAT_PLACEHOLDER, Style::default().fg(colors::DIM)),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(colors::CHAT_USER)),
            Span::raw(state.chat_input.as_str()),
        ])
    };
    frame.render_widget(Paragraph::new(input), rows[2]);
    if focused && !state.chat_composing {
        let x = rows[2].x + 2 + (state.chat_input.chars().count() as u16).min(rows[2].width.saturating_sub(3));
        frame.set_cursor_position((x, rows[2].y));
    }
}

// === Footer and overlays ===

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_footer: called");
    let mut keybinds = match state.focus {
        Focus::Destination => vec![("Enter", "Go"), ("Tab", "Next pane"), ("Esc", "Leave input")],
        Focus::Itinerary => vec![("←/→", "Tabs"), ("↑/↓", "Scroll"), ("n/p", "Markers"), ("Tab", "Next pane")],
        Focus::Map => vec![("n/p", "Select marker"), ("Esc", "Clear"), ("Tab", "Next pane")],
        Focus::Chat => vec![("Enter", "Send"), ("↑/↓", "Scroll"), ("Esc", "Leave chat")],
    };
    if state.chat_available {
        keybinds.push(("Ctrl+A", if state.chat_open { "Close chat" } else { "Ask assistant" }));
    }
    if !state.focus.is_text_input() {
        keybinds.push(("?", "Help"));
        keybinds.push(("q", "Quit"));
    }

    let mut spans = Vec::new();
    for (key, desc) in keybinds {
        spans.push(Span::styled(format!(" {} ", key), Style::default().fg(colors::KEYBIND)));
        spans.push(Span::styled(format!("{} ", desc), Style::default().fg(colors::DIM)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    trace!("render_help_overlay: called");
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )),
        Line::from(""),
        Line::from(Span::styled("Global", bold)),
        key_line("Tab", "Cycle panes (Destination → Itinerary → Map → Chat)"),
        key_line("Ctrl+A", "Open/close the trip assistant"),
        key_line("?", "Toggle help"),
        key_line("q", "Quit (outside text inputs)"),
        key_line("Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled("Destination", bold)),
        key_line("Enter", "Plan the trip"),
        key_line("Esc", "Leave the input"),
        Line::from(""),
        Line::from(Span::styled("Itinerary", bold)),
        key_line("←/→ h/l", "Switch tabs"),
        key_line("↑/↓ j/k", "Scroll"),
        key_line("g", "Back to top"),
        Line::from(""),
        Line::from(Span::styled("Map", bold)),
        key_line("n/p", "Next/previous marker"),
        key_line("Esc", "Clear selection"),
        Line::from(""),
        Line::from(Span::styled("Chat", bold)),
        key_line("Enter", "Send question"),
        key_line("↑/↓", "Scroll conversation"),
    ];

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(colors::HEADER)),
    );
    frame.render_widget(help, popup_area);
}

fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
