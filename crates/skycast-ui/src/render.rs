//! Text rendering of a widget snapshot.
//!
//! Pure: the same state and context always produce the same text.

use chrono::NaiveDate;
use skycast_weather::{rounded, ConditionsResult, ForecastEntry, QueryBuilder, UnitSystem};

use crate::state::{ForecastState, UiState};

pub struct RenderContext<'a> {
    /// Resolves icon identifiers to image URLs
    pub queries: &'a QueryBuilder,
    /// Date shown in the header
    pub today: NaiveDate,
}

pub fn render(state: &UiState, ctx: &RenderContext<'_>) -> String {
    let mut lines = vec![ctx.today.format("%A, %B %-d, %Y").to_string()];

    if let Some(banner) = state.error() {
        lines.push(format!("[!] {}", banner.message));
    }

    if state.is_loading() {
        lines.push("Searching...".to_string());
    }

    let units = state.units();

    if let Some(conditions) = state.conditions() {
        render_conditions(&mut lines, conditions, units, ctx);
    }

    match state.forecast() {
        ForecastState::Empty => {}
        ForecastState::Pending => lines.push("Loading forecast...".to_string()),
        ForecastState::Unavailable(reason) => {
            lines.push(format!("Forecast unavailable: {}", reason));
        }
        ForecastState::Ready(entries) if entries.is_empty() => {
            lines.push("No forecast entries".to_string());
        }
        ForecastState::Ready(entries) => {
            lines.push("Forecast".to_string());
            lines.extend(entries.iter().map(|e| forecast_card(e, units, ctx)));
        }
    }

    lines.push(format!("Units: {}", units.label()));
    lines.join("\n")
}

fn temperature(value: f64, units: UnitSystem) -> String {
    format!("{}{}", rounded(value), units.symbol())
}

fn render_conditions(
    lines: &mut Vec<String>,
    c: &ConditionsResult,
    units: UnitSystem,
    ctx: &RenderContext<'_>,
) {
    lines.push(c.name.clone());
    lines.push(format!(
        "  {}  {}  {}",
        temperature(c.temperature, units),
        c.condition,
        ctx.queries.icon_url(&c.icon)
    ));
    lines.push(format!(
        "  Feels Like {} | Humidity {}% | Max Temp {}",
        temperature(c.feels_like, units),
        c.humidity,
        temperature(c.temp_max, units)
    ));
    lines.push(format!(
        "  Wind Speed {} {} | Wind Direction {}° ({})",
        rounded(c.wind.speed),
        units.speed_unit(),
        rounded(c.wind.deg),
        c.wind.compass_point()
    ));
}

fn forecast_card(entry: &ForecastEntry, units: UnitSystem, ctx: &RenderContext<'_>) -> String {
    let when = entry
        .time()
        .map(|t| t.format("%a %d %b %H:%M").to_string())
        .unwrap_or_else(|| entry.timestamp.clone());

    format!(
        "  {}  {}  {}  {}",
        when,
        temperature(entry.temperature, units),
        entry.description,
        ctx.queries.icon_url(&entry.icon)
    )
}
