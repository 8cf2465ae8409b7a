use anyhow::Result;
use calgrid_core::{events_in_range, EventDraft, EventId, EVENT_COLOR_PALETTE};
use chrono::NaiveDate;

use super::{parse_date, parse_date_time, Controller, EventFields};
use crate::render::render_event;

/// Creates an event on `on` (or the start's day, or today).
pub fn add(
    controller: &mut Controller,
    title: String,
    on: Option<&str>,
    fields: EventFields,
) -> Result<()> {
    let mut draft = EventDraft::new(title);
    apply_fields(&mut draft, fields)?;

    let day = match (on, draft.start_date) {
        (Some(on), _) => parse_date(on)?,
        (None, Some(start)) => start.date(),
        (None, None) => controller.anchor(),
    };

    controller.select_date(day);
    let created = controller.save_draft(draft)?;
    println!("created {}", render_event(&created));
    Ok(())
}

/// Edits an existing event; omitted fields keep their current value.
pub fn update(
    controller: &mut Controller,
    id: &str,
    title: Option<String>,
    fields: EventFields,
) -> Result<()> {
    controller.select_event(&EventId::from(id))?;
    let Some(mut draft) = controller.draft_for_selection() else {
        anyhow::bail!("event '{}' disappeared while editing", id);
    };
    if let Some(title) = title {
        draft.title = title;
    }
    apply_fields(&mut draft, fields)?;

    let updated = controller.save_draft(draft)?;
    println!("updated {}", render_event(&updated));
    Ok(())
}

pub fn delete(controller: &mut Controller, id: &str) -> Result<()> {
    controller.select_event(&EventId::from(id))?;
    let deleted = controller.delete_selected()?;
    println!("deleted {deleted}");
    Ok(())
}

pub fn list(controller: &Controller, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let first = from.map(parse_date).transpose()?.unwrap_or(NaiveDate::MIN);
    let last = to.map(parse_date).transpose()?.unwrap_or(NaiveDate::MAX);

    let events = events_in_range(controller.store().events(), first, last);
    if events.is_empty() {
        println!("no events");
    }
    for event in events {
        println!("{}", render_event(event));
    }
    Ok(())
}

pub fn colors() {
    for option in EVENT_COLOR_PALETTE {
        println!("{:<8}{}", option.label, option.value);
    }
}

fn apply_fields(draft: &mut EventDraft, fields: EventFields) -> Result<()> {
    if let Some(start) = fields.start {
        draft.start_date = Some(parse_date_time(&start)?);
    }
    if let Some(end) = fields.end {
        draft.end_date = Some(parse_date_time(&end)?);
    }
    if let Some(description) = fields.description {
        draft.description = Some(description);
    }
    if let Some(color) = fields.color {
        draft.color = Some(color);
    }
    if let Some(category) = fields.category {
        draft.category = Some(category);
    }
    Ok(())
}
