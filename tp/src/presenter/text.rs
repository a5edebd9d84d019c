//! Plain-text rendering for batch output

use std::fmt::Write;

use colored::Colorize;

use super::{ItineraryTab, LegacyView, Presentation, StructuredView};

/// Render either branch as terminal text
pub fn render(presentation: &Presentation) -> String {
    match presentation {
        Presentation::Structured(view) => render_structured(view),
        Presentation::Legacy(view) => render_legacy(view),
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.bold().cyan());
}

fn render_structured(view: &StructuredView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title.bold());

    if let Some(weather) = &view.weather {
        heading(&mut out, "Current Weather");
        let _ = writeln!(out, "  {}°C  wind {} km/h", weather.temperature, weather.wind);
        let _ = writeln!(out, "  Today {}° / {}°", weather.today_high, weather.today_low);
    }
    if let Some(summary) = &view.summary {
        heading(&mut out, "Weather Summary");
        let _ = writeln!(out, "  {}", summary);
    }

    for tab in ItineraryTab::ALL {
        heading(&mut out, tab.title());
        match tab {
            ItineraryTab::Attractions => {
                for row in &view.attractions {
                    let order = row.visit_order.as_deref().map(|o| format!("[{}] ", o)).unwrap_or_default();
                    let rating = row.rating.as_deref().map(|r| format!(" ★ {}", r)).unwrap_or_default();
                    let _ = writeln!(out, "  {}{}{}", order, row.name.bold(), rating);
                    if !row.description.is_empty() {
                        let _ = writeln!(out, "    {}", row.description);
                    }
                }
            }
            ItineraryTab::Dining => {
                for row in &view.dining {
                    let cuisine = row.cuisine.as_deref().map(|c| format!(" ({})", c)).unwrap_or_default();
                    let rating = row.rating.as_deref().map(|r| format!(" ★ {}", r)).unwrap_or_default();
                    let _ = writeln!(out, "  {}{}{}", row.name.bold(), cuisine, rating);
                    if !row.description.is_empty() {
                        let _ = writeln!(out, "    {}", row.description);
                    }
                }
            }
            ItineraryTab::Plan => {
                let _ = writeln!(out, "  Transport: {}", view.costs.transport);
                let _ = writeln!(out, "  Total Estimate: {}", view.costs.total);
                for day in &view.days {
                    let _ = writeln!(out, "  {}", day.label.bold());
                    for activity in &day.activities {
                        let _ = writeln!(out, "    - {}", activity);
                    }
                }
            }
        }
    }
    out
}

fn render_legacy(view: &LegacyView) -> String {
    let mut out = String::new();

    if let Some(weather) = &view.weather {
        heading(&mut out, "Current Weather");
        let _ = writeln!(out, "  {}°C  wind {} km/h", weather.temperature, weather.wind);
        let forecast: Vec<String> = weather.forecast.iter().map(|(day, high)| format!("{} {}°", day, high)).collect();
        if !forecast.is_empty() {
            let _ = writeln!(out, "  {}", forecast.join("  "));
        }
    }

    heading(&mut out, "AI Travel Plan");
    let _ = writeln!(out, "{}", view.narrative);

    if !view.attractions.is_empty() {
        heading(&mut out, "Top Attractions");
        for row in &view.attractions {
            let _ = writeln!(out, "  {}", row.name.bold());
            if !row.address.is_empty() {
                let _ = writeln!(out, "    {}", row.address);
            }
            if !row.categories.is_empty() {
                let _ = writeln!(out, "    {}", row.categories.join(", "));
            }
        }
    }

    if !view.restaurants.is_empty() {
        heading(&mut out, "Nearby Dining");
        for row in &view.restaurants {
            let _ = writeln!(out, "  {} ★ {}", row.name.bold(), row.rating);
            if !row.address.is_empty() {
                let _ = writeln!(out, "    {}", row.address);
            }
        }
    }

    if let Some(costs) = &view.costs {
        heading(&mut out, "Estimated Costs");
        for (label, value) in costs {
            let _ = writeln!(out, "  {}: {}", label, value);
        }
    }
    out
}
