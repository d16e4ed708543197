//! Plain-text cards for published views.

use std::fmt::Write;

use weatherboard_core::{
    DashboardView, Published,
    observation::capitalize,
    publish::{CurrentView, DailyView, HourlyView},
};

const ABSENT: &str = "-";

fn or_absent(value: Option<&str>) -> &str {
    value.unwrap_or(ABSENT)
}

pub fn view(view: &DashboardView) -> String {
    let mut out = String::new();
    match view {
        DashboardView::Daily {
            current,
            hourly,
            summary,
        } => {
            current_card(&mut out, current);
            let _ = writeln!(out, "\nHourly forecast");
            for hour in hourly {
                hourly_card(&mut out, hour);
            }
            let _ = writeln!(
                out,
                "\nNext 24h: {} / {}, {}",
                or_absent(summary.max_temperature.as_deref()),
                or_absent(summary.min_temperature.as_deref()),
                or_absent(summary.weather_description.as_deref()),
            );
        }
        DashboardView::FiveDay {
            location_name,
            days,
        } => {
            let _ = writeln!(out, "Weather in {location_name} for 5 days");
            for day in days {
                daily_card(&mut out, day);
            }
        }
        DashboardView::NotFound { query } => {
            let name = query.as_deref().map(capitalize);
            let _ = writeln!(
                out,
                "{} could not be found.\nMaybe you're looking for something else?",
                name.as_deref().unwrap_or("Your location")
            );
        }
    }
    out
}

fn current_card(out: &mut String, current: &Published<CurrentView>) {
    let obs = &current.observation;
    let _ = writeln!(
        out,
        "Weather in {}, {}",
        or_absent(current.city_name.as_deref()),
        or_absent(current.country_code.as_deref())
    );
    let _ = writeln!(out, "{}", obs.date_time);
    let _ = writeln!(out, "{}  {}", obs.temperature.current, obs.weather_description);
    let _ = writeln!(out, "Feels like: {}", obs.temperature.feels_like);
    let _ = writeln!(out, "Sunrise:    {}", or_absent(current.sunrise.as_deref()));
    let _ = writeln!(out, "Sunset:     {}", or_absent(current.sunset.as_deref()));
    let _ = writeln!(out, "Humidity:   {}", obs.humidity);
    let _ = writeln!(out, "Wind:       {}", obs.wind.speed);
}

fn hourly_card(out: &mut String, hour: &Published<HourlyView>) {
    let obs = &hour.observation;
    let _ = writeln!(
        out,
        "{:>8}  {:>6}  humidity {:>4}  wind {:>7}  precipitation {:>4}",
        hour.time, obs.temperature.max, obs.humidity, obs.wind.speed, hour.precipitation
    );
}

fn daily_card(out: &mut String, day: &Published<DailyView>) {
    let _ = writeln!(
        out,
        "\n{}, {}",
        or_absent(day.day_of_week.as_deref()),
        or_absent(day.date.as_deref())
    );
    let _ = writeln!(out, "{}", or_absent(day.weather_description.as_deref()));
    let _ = writeln!(
        out,
        "{} / {}",
        or_absent(day.max_temperature.as_deref()),
        or_absent(day.min_temperature.as_deref())
    );
    let _ = writeln!(
        out,
        "Humidity: {}  Wind: {}  Precipitation: {}",
        day.humidity,
        day.wind_speed,
        or_absent(day.precipitation.as_deref())
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_query() {
        let out = view(&DashboardView::NotFound {
            query: Some("atlantis".into()),
        });
        assert!(out.starts_with("Atlantis could not be found."));
    }

    #[test]
    fn not_found_without_query() {
        let out = view(&DashboardView::NotFound { query: None });
        assert!(out.starts_with("Your location could not be found."));
    }

    #[test]
    fn five_day_heading() {
        let out = view(&DashboardView::FiveDay {
            location_name: "Lviv".into(),
            days: Vec::new(),
        });
        assert_eq!(out, "Weather in Lviv for 5 days\n");
    }
}
