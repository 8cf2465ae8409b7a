//! Plain-text rendering of grids and event lists.

use calgrid_core::{CalendarEvent, CellView};
use chrono::{Datelike, NaiveDate};

const CELL_WIDTH: usize = 8;

/// Renders cells as rows of seven.
///
/// `*` marks today, `+` the day an event is being created on, parentheses days outside the
/// current month; the number after `:` is the event count.
pub fn render_grid(cells: &[CellView<'_>]) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(first_row) = cells.get(..7) {
        let header: Vec<String> = first_row
            .iter()
            .map(|cell| format!("{:<CELL_WIDTH$}", cell.date.format("%a").to_string()))
            .collect();
        lines.push(header.concat().trim_end().to_string());
    }

    for row in cells.chunks(7) {
        let rendered: Vec<String> = row
            .iter()
            .map(|cell| format!("{:<CELL_WIDTH$}", render_cell(cell)))
            .collect();
        lines.push(rendered.concat().trim_end().to_string());
    }
    lines
}

fn render_cell(cell: &CellView<'_>) -> String {
    let day = if cell.in_current_period {
        format!("{:>2}", cell.date.day())
    } else {
        format!("({})", cell.date.day())
    };
    let marker = match (cell.is_today, cell.is_selected) {
        (true, true) => "*+",
        (true, false) => "*",
        (false, true) => "+",
        (false, false) => "",
    };
    if cell.events.is_empty() {
        format!("{day}{marker}")
    } else {
        format!("{day}{marker}:{}", cell.events.len())
    }
}

/// One line per event: id, time span, title and tags.
pub fn render_event(event: &CalendarEvent) -> String {
    let mut line = format!(
        "{}  {} -> {}  {}",
        event.id,
        event.start_date.format("%Y-%m-%d %H:%M"),
        render_end(event),
        event.title
    );
    if let Some(category) = &event.category {
        line.push_str(&format!(" [{category}]"));
    }
    line.push_str(&format!(" {}", event.color));
    line
}

fn render_end(event: &CalendarEvent) -> String {
    if event.start_day() == event.end_day() {
        event.end_date.format("%H:%M").to_string()
    } else {
        event.end_date.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Day heading, e.g. `Sun Mar 10 2024`.
pub fn render_day_heading(date: NaiveDate) -> String {
    date.format("%a %b %-d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::{render_cell, render_event, render_grid};
    use calgrid_core::{CalendarEvent, CellView, EventId, DEFAULT_EVENT_COLOR};
    use chrono::NaiveDate;

    fn event() -> CalendarEvent {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        CalendarEvent {
            id: EventId::from("evt-1"),
            title: "Standup".to_string(),
            description: None,
            start_date: day.and_hms_opt(9, 0, 0).unwrap(),
            end_date: day.and_hms_opt(9, 30, 0).unwrap(),
            color: DEFAULT_EVENT_COLOR.to_string(),
            category: Some("work".to_string()),
        }
    }

    #[test]
    fn cell_shows_markers_and_count() {
        let standup = event();
        let cell = CellView {
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            is_today: true,
            is_selected: false,
            in_current_period: true,
            events: vec![&standup],
        };
        assert_eq!(render_cell(&cell), "10*:1");

        let outside = CellView {
            date: NaiveDate::from_ymd_opt(2024, 2, 25).unwrap(),
            is_today: false,
            is_selected: true,
            in_current_period: false,
            events: Vec::new(),
        };
        assert_eq!(render_cell(&outside), "(25)+");
    }

    #[test]
    fn grid_marks_only_the_creating_day() {
        let creating_on = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let cells: Vec<CellView<'_>> = (10..17)
            .map(|day| {
                let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
                CellView {
                    date,
                    is_today: false,
                    is_selected: date == creating_on,
                    in_current_period: true,
                    events: Vec::new(),
                }
            })
            .collect();

        let lines = render_grid(&cells);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Sun"));
        assert_eq!(lines[1].matches('+').count(), 1);
        assert!(lines[1].contains("12+"));
    }

    #[test]
    fn same_day_event_shows_short_end() {
        assert_eq!(
            render_event(&event()),
            "evt-1  2024-03-10 09:00 -> 09:30  Standup [work] #3b82f6"
        );
    }
}
