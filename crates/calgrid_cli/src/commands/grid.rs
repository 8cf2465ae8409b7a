use anyhow::Result;

use super::{parse_date, Controller};
use crate::render::{render_day_heading, render_event, render_grid};

pub fn run(controller: &mut Controller, date: Option<&str>, next: u32, prev: u32) -> Result<()> {
    if let Some(date) = date {
        controller.set_anchor(parse_date(date)?);
    }
    for _ in 0..next {
        controller.go_to_next();
    }
    for _ in 0..prev {
        controller.go_to_previous();
    }

    println!("{} ({})", controller.period_label(), controller.view_mode().as_str());
    for line in render_grid(&controller.current_grid()) {
        println!("{line}");
    }

    let visible = controller.visible_events();
    if !visible.is_empty() {
        println!();
        for event in visible {
            println!("{}", render_event(event));
        }
    }
    Ok(())
}

pub fn day(controller: &Controller, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let events = controller.events_for_cell(date);

    println!("{}", render_day_heading(date));
    if events.is_empty() {
        println!("  no events");
    }
    for event in events {
        println!("  {}", render_event(event));
    }
    Ok(())
}
