//! HTML rendering for the prediction form

use crate::encoding::{CategoricalColumn, EncodingTable};
use crate::types::request::{
    COST_FOR_TWO_MAX, COST_FOR_TWO_MIN, TOTAL_VOTES_MAX, TOTAL_VOTES_MIN,
};
use crate::web::handlers::PredictionForm;
use std::fmt::Write;

pub const PAGE_TITLE: &str = "Restaurant Rating Prediction";
pub const HEADING: &str = "Welcome to Restaurant Rating Prediction App";
pub const GENERIC_ERROR: &str = "An error occurred while predicting the rating.";

/// What to show under the form
pub enum Outcome {
    /// Fresh page, nothing submitted yet
    Empty,
    /// Result sentence of a successful prediction
    Rating(String),
    /// Generic failure message
    Error,
}

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 42rem; margin: 2rem auto; padding: 0 1rem; }
label { display: block; margin-top: 0.8rem; font-weight: bold; }
select, input { width: 100%; padding: 0.3rem; margin-top: 0.2rem; }
button { margin-top: 1.2rem; padding: 0.5rem 1.5rem; }
.success { background: #e6f4ea; border: 1px solid #34a853; padding: 0.8rem; margin-top: 1.5rem; }
.error { background: #fce8e6; border: 1px solid #d93025; padding: 0.8rem; margin-top: 1.5rem; }
footer { margin-top: 2rem; border-top: 1px solid #ccc; padding-top: 0.5rem; color: #666; }
"#;

/// Render the full form page.
///
/// `values` pre-fills the form, so a submitted page keeps the user's choices.
pub fn render(encodings: &EncodingTable, values: &PredictionForm, outcome: &Outcome) -> String {
    let mut html = String::with_capacity(16 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <h1>{heading}</h1>\n\
         <p>Enter details about the restaurant, and I will predict the rating for you!</p>\n\
         <form method=\"post\" action=\"/predict\">\n",
        title = PAGE_TITLE,
        style = STYLE,
        heading = HEADING,
    );

    let yes_no = ["Yes".to_string(), "No".to_string()];
    select(&mut html, "online_orders", "Online Orders", &yes_no, &values.online_orders);
    select(&mut html, "book_table", "Book Table", &yes_no, &values.book_table);
    number(
        &mut html,
        "total_votes",
        "Total Votes",
        TOTAL_VOTES_MIN,
        TOTAL_VOTES_MAX,
        &values.total_votes,
    );
    select(
        &mut html,
        "restaurant_location",
        "Restaurant Location",
        encodings.categories(CategoricalColumn::Location),
        &values.restaurant_location,
    );
    select(
        &mut html,
        "restaurant_type",
        "Restaurant Type",
        encodings.categories(CategoricalColumn::Type),
        &values.restaurant_type,
    );
    select(
        &mut html,
        "cuisine_types",
        "Cuisine Types",
        encodings.categories(CategoricalColumn::Cuisine),
        &values.cuisine_types,
    );
    number(
        &mut html,
        "cost_for_two",
        "Cost for Two",
        COST_FOR_TWO_MIN,
        COST_FOR_TWO_MAX,
        &values.cost_for_two,
    );
    select(
        &mut html,
        "restaurant_service",
        "Restaurant Service",
        encodings.categories(CategoricalColumn::Service),
        &values.restaurant_service,
    );

    html.push_str("<button type=\"submit\">Predict Rating</button>\n</form>\n");

    match outcome {
        Outcome::Empty => {}
        Outcome::Rating(message) => {
            let _ = write!(
                html,
                "<h2>Predicted Restaurant Rating:</h2>\n<div class=\"success\">{}</div>\n",
                escape(message)
            );
        }
        Outcome::Error => {
            let _ = write!(html, "<div class=\"error\">{}</div>\n", GENERIC_ERROR);
        }
    }

    html.push_str("<footer>Restaurant rating predictor</footer>\n</body>\n</html>\n");
    html
}

fn select(html: &mut String, name: &str, label: &str, options: &[String], selected: &str) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n"
    );
    for option in options {
        let marker = if option == selected { " selected" } else { "" };
        let escaped = escape(option);
        let _ = write!(
            html,
            "<option value=\"{escaped}\"{marker}>{escaped}</option>\n"
        );
    }
    html.push_str("</select>\n");
}

fn number(html: &mut String, name: &str, label: &str, min: i64, max: i64, value: &str) {
    let value = if value.is_empty() {
        min.to_string()
    } else {
        escape(value)
    };
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" value=\"{value}\">\n"
    );
}

/// Escape text for use in HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
