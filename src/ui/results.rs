//! Result panel for a settled lookup

use crate::lookup::LookupRecord;
use crate::lookup_state::LookupState;
use crate::theme::{Styles, UiConstants};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn field(label: &str, value: String, style: Style) -> Line<'static> {
    let width = UiConstants::LABEL_WIDTH as usize;
    Line::from(vec![
        Span::styled(format!("{label:<width$}"), Styles::label()),
        Span::styled(value, style),
    ])
}

/// "District, Region, Country" from whichever parts the service returned
fn location(record: &LookupRecord) -> Option<String> {
    let parts: Vec<&str> = [&record.admin_district, &record.region, &record.country]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

pub fn record_lines(record: &LookupRecord) -> Vec<Line<'static>> {
    let ngr_style = if record.is_converted() {
        Styles::grid_ref()
    } else {
        Styles::error()
    };

    let mut lines = vec![
        field("National Grid", record.ngr_formatted.clone(), ngr_style),
        Line::default(),
        field("Easting", record.easting_display(), Styles::value()),
        field("Northing", record.northing_display(), Styles::value()),
        field("Latitude", record.geo_lat_display(), Styles::value()),
        field("Longitude", record.geo_lon_display(), Styles::value()),
        Line::default(),
    ];

    if let Some(postcode) = &record.postcode {
        lines.push(field("Postcode", postcode.clone(), Styles::text()));
    }
    if let Some(place) = location(record) {
        lines.push(field("Location", place, Styles::text()));
    }
    match record.map_url() {
        Some(url) => lines.push(field("Map", url, Styles::link())),
        None => lines.push(field("Map", "n/a".to_string(), Styles::text_muted())),
    }

    if let Some(err) = &record.conversion_error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(err.clone(), Styles::warning())));
    }

    lines
}

pub fn render_results(f: &mut Frame, area: Rect, state: &LookupState) {
    let Some(record) = state.record() else {
        return;
    };

    let panel = Paragraph::new(record_lines(record))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active())
                .title(" Result "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}
