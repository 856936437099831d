//! Plain-text rendering of the screens.

use std::fmt;

use cityweather_catalog::{CityRecord, SortField};

use crate::models::{CityBrowserModel, MenuItem, WeatherModel, WeatherViewState};

const NAME_WIDTH: usize = 28;
const COUNTRY_WIDTH: usize = 24;

/// City table with search box, ordering line and pagination footer.
pub struct CitiesView<'a> {
    pub model: &'a CityBrowserModel,
    pub visible_rows: usize,
}

impl fmt::Display for CitiesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.model.state();
        let search = state.search();

        if search.query.is_empty() {
            writeln!(f, "Search: [Search cities...]")?;
        } else {
            writeln!(f, "Search: [{}]", search.query)?;
            for (i, city) in search.suggestions.iter().enumerate() {
                writeln!(f, "  ({}) {}", i + 1, city.name)?;
            }
        }

        let filter = state
            .filter()
            .map(|o| o.label())
            .unwrap_or("Select an option");
        let sort = state
            .sort_option()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string());
        writeln!(f, "Filter: {filter} | Sort: {sort}")?;
        writeln!(f)?;

        writeln!(
            f,
            "{:>5}  {:<nw$} {:<cw$} {}",
            "#",
            SortField::Name.title(),
            SortField::Country.title(),
            SortField::Timezone.title(),
            nw = NAME_WIDTH,
            cw = COUNTRY_WIDTH,
        )?;

        let view = state.view();
        let end = (self.model.last_visible() + 1).min(view.len());
        let start = end.saturating_sub(self.visible_rows);
        let menu = self.model.menu();

        for (offset, city) in view[start..end].iter().enumerate() {
            let row = start + offset;
            write_row(f, row, city)?;
            if menu.anchor_row() == Some(row) {
                write_menu(f, menu.highlighted())?;
            }
        }

        if self.model.is_loading() {
            writeln!(f, "Loading...")?;
        } else if !state.pagination().has_more() {
            writeln!(f, "No more data to load.")?;
        }

        write!(f, "{} of {} cities", end, view.len())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, row: usize, city: &CityRecord) -> fmt::Result {
    writeln!(
        f,
        "{:>5}  {:<nw$} {:<cw$} {}",
        row + 1,
        truncate(&city.name, NAME_WIDTH),
        truncate(&city.country_name, COUNTRY_WIDTH),
        city.timezone,
        nw = NAME_WIDTH,
        cw = COUNTRY_WIDTH,
    )
}

fn write_menu(f: &mut fmt::Formatter<'_>, highlighted: Option<usize>) -> fmt::Result {
    for (i, item) in MenuItem::ALL.iter().enumerate() {
        let marker = if highlighted == Some(i) { '>' } else { ' ' };
        writeln!(f, "       {marker}[{}] {}", i + 1, item.label())?;
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub struct WeatherView<'a> {
    pub model: &'a WeatherModel,
}

impl fmt::Display for WeatherView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = match self.model.view() {
            WeatherViewState::Loading => return write!(f, "Loading..."),
            WeatherViewState::Loaded(record) => record,
        };
        let city = self.model.city().unwrap_or(&record.city_name);

        writeln!(f, "Weather for {city}")?;
        writeln!(
            f,
            "Temperature: {} {}",
            record.temperature,
            record.unit.temperature_symbol()
        )?;
        writeln!(f, "Description: {}", record.description)?;
        writeln!(f, "Humidity: {}%", record.humidity)?;
        writeln!(
            f,
            "Wind Speed: {} {}",
            record.wind_speed,
            record.unit.wind_speed_symbol()
        )?;
        writeln!(f, "Pressure: {} hPa", record.pressure)?;
        write!(f, "Updated: {}", record.updated_label())
    }
}

/// One line listing every tab, the active one bracketed.
pub struct TabBar<'a> {
    pub titles: &'a [String],
    pub active: usize,
}

impl fmt::Display for TabBar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, title) in self.titles.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            if i == self.active {
                write!(f, "[{}: {}]", i + 1, title)?;
            } else {
                write!(f, " {}: {} ", i + 1, title)?;
            }
        }
        Ok(())
    }
}
