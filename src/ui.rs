use crate::app::{App, LoadState};
use province_map::map::{MapLayers, RegionStyle};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Provincias ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &app.load_state {
        LoadState::Loading => {
            render_notice(frame, inner, "Loading provinces…", Color::DarkGray);
            return;
        }
        LoadState::Failed(message) => {
            render_notice(frame, inner, &format!("Could not load the map: {message}"), Color::Red);
            return;
        }
        LoadState::Ready => {}
    }

    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        app.markers(),
        app.entities(),
    );
    frame.render_widget(MapWidget { layers }, inner);
}

fn render_notice(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let top = area.height / 2;
    let notice = Rect { y: area.y + top, height: area.height - top, ..area };
    let paragraph = Paragraph::new(Span::styled(text.to_string(), Style::default().fg(color)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, notice);
}

/// Braille outlines with province labels and avatar markers on top
struct MapWidget {
    layers: MapLayers,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let outlines = &self.layers.outlines;
        for row in 0..area.height.min(outlines.height() as u16) {
            for col in 0..area.width.min(outlines.width() as u16) {
                if let Some((ch, style)) = outlines.cell(col as usize, row as usize) {
                    buf[(area.x + col, area.y + row)].set_char(ch).set_fg(style.color());
                }
            }
        }

        for label in &self.layers.labels {
            if label.row >= area.height || label.col >= area.width {
                continue;
            }
            let mut style = Style::default().fg(Color::White);
            if label.style >= RegionStyle::Hovered {
                style = style.fg(label.style.color()).add_modifier(Modifier::BOLD);
            }
            let max_len = (area.width - label.col) as usize;
            for (i, ch) in label.text.chars().take(max_len.min(24)).enumerate() {
                buf[(area.x + label.col + i as u16, area.y + label.row)]
                    .set_char(ch)
                    .set_style(style);
            }
        }

        let marker_style = Style::default()
            .fg(Color::Black)
            .bg(Color::LightGreen)
            .add_modifier(Modifier::BOLD);
        for &(col, row, glyph) in &self.layers.markers {
            if col < area.width && row < area.height {
                buf[(area.x + col, area.y + row)].set_char(glyph).set_style(marker_style);
            }
        }
    }
}

/// Key hint for a layer toggle. The hint names the key that flips it, so it
/// reads the same in both states; only the colour changes.
fn toggle_span(on: bool, hint: &'static str) -> Span<'static> {
    Span::styled(hint, Style::default().fg(if on { Color::Green } else { Color::DarkGray }))
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim),
    ];

    if let Some(name) = app.hovered() {
        spans.push(Span::styled(name.to_string(), Style::default().fg(RegionStyle::Hovered.color())));
        spans.push(Span::styled(format!(" ({}) ", app.occupants(name)), dim));
    }
    if let Some(name) = app.selected() {
        spans.push(Span::styled("★ ", Style::default().fg(RegionStyle::Selected.color())));
        spans.push(Span::styled(format!("{name} "), Style::default().fg(RegionStyle::Selected.color())));
    }

    spans.extend([
        Span::styled("| ", dim),
        toggle_span(settings.show_labels, "[L]abels "),
        toggle_span(settings.show_markers, "[m]arkers "),
        Span::styled("| ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | hjkl:pan +/-:zoom f/r:fit click:select q:quit", dim),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
