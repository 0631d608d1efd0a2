use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

/// Routes listed on the welcome page, with what each one returns.
const ROUTES: &[(&str, &str)] = &[
    (
        "/api/v1.0/precipitation",
        "Precipitation for the last 12 months of the dataset",
    ),
    ("/api/v1.0/stations", "All observing stations"),
    (
        "/api/v1.0/tobs",
        "Last 12 months of temperature observations from the most active station",
    ),
    (
        "/api/v1.0/tobs/summary",
        "Lowest, average and highest temperature of the most active station",
    ),
];

pub fn home_page(api_base: &str) -> Markup {
    let config = PageConfig {
        title: "Hawaii Climate Info API",
        api_base,
    };

    base(&config, content(api_base))
}

fn content(api_base: &str) -> Markup {
    html! {
        div class="content" {
            h3 class="subtitle" { "Available Routes" }
            ul {
                @for (path, description) in ROUTES {
                    li {
                        a href=(format!("{}{}", api_base, path)) { code { (path) } }
                        " : " (description)
                    }
                }
            }

            h4 { "Temperature from start date to end of data set" }
            p { code { "/api/v1.0/YYYY-MM-DD" } }

            h4 { "Temperature for a date range" }
            p { code { "/api/v1.0/YYYY-MM-DD/YYYY-MM-DD" } }

            p class="is-size-7" {
                "Dates are inclusive and must use the YYYY-MM-DD form. "
                "Summaries return min, avg and max, or null when no observations fall in the range."
            }
        }
    }
}
