//! Server-side HTML for the name checker page.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};

use crate::ads::{AdConfig, RESULT_SLOT_ID, TOP_SLOT_ID};
use crate::decay::{MAX_DECAY_MONTHS, MIN_DECAY_MONTHS};
use crate::models::{MIN_NAME_LEN, PAGE_PATH, Region};
use crate::page::{PageView, Verdict};

const TITLE: &str = "Name availability checker - NamesLoL";
const DESCRIPTION: &str = "League of Legends name checker. Find out if a summoner name is available, or exactly when it is going to expire.";

pub fn render_page(view: &PageView, ad_config: &AdConfig, toasts: &[String]) -> String {
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n\
         <meta name=\"description\" content=\"{DESCRIPTION}\">\n\
         <link rel=\"icon\" href=\"/favicon.ico\">\n\
         </head>\n<body>\n<main>\n\
         <h1>LoL Name Checker</h1>\n\
         <h2>Find out if a summoner name is available or when it is going to expire</h2>\n"
    );

    render_form(&mut html, view);
    render_ad_slot(&mut html, TOP_SLOT_ID, ad_config);

    if view.loading {
        html.push_str("<section class=\"loading\" aria-busy=\"true\"></section>\n");
    } else if let Some(verdict) = &view.verdict {
        render_verdict(&mut html, verdict);
        render_ad_slot(&mut html, RESULT_SLOT_ID, ad_config);
    }

    html.push_str("<div class=\"toaster\">\n");
    for message in toasts {
        let _ = writeln!(
            html,
            "<div class=\"toast error\" role=\"alert\">{}</div>",
            escape_html(message)
        );
    }
    html.push_str("</div>\n</main>\n</body>\n</html>\n");

    html
}

fn render_form(html: &mut String, view: &PageView) {
    let _ = writeln!(
        html,
        "<section class=\"form\">\n<form method=\"get\" action=\"{PAGE_PATH}\">\n\
         <label for=\"summoner-name\">* Summoner Name</label>\n\
         <input id=\"summoner-name\" name=\"name\" placeholder=\"Summoner Name\" \
         required minlength=\"{MIN_NAME_LEN}\" value=\"{}\">\n\
         <label for=\"region\">* Region</label>\n<select id=\"region\" name=\"region\">",
        escape_html(&view.form.name)
    );

    for region in Region::ALL {
        let selected = if region == view.form.region {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{selected}>{}</option>",
            region.code(),
            escape_html(region.display_name())
        );
    }

    // The name gate is left to `minlength` so it tracks what the user types.
    let _ = writeln!(
        html,
        "</select>\n<button type=\"submit\" data-href=\"{}\">Check Availability &rarr;</button>\n\
         </form>\n</section>",
        escape_html(&view.submit_url)
    );
}

fn render_verdict(html: &mut String, verdict: &Verdict) {
    html.push_str("<section class=\"availability\">\n");

    match verdict {
        Verdict::Found {
            name,
            level,
            status,
            revision_date,
            availability_date,
        } => {
            let word = if status.available {
                "<span class=\"available\">available</span>"
            } else {
                "<span class=\"unavailable\">unavailable</span>"
            };
            let expiry_label = if status.available {
                "Expired:"
            } else {
                "Expires:"
            };

            let _ = writeln!(
                html,
                "<h3>Summoner name &#39;{}&#39; is {word}.</h3>\n\
                 <p class=\"info\"><span>Level:</span> {level}</p>\n\
                 <p class=\"info\"><span>Last Activity:</span> {}</p>\n\
                 <p class=\"info\"><span>Name Decay:</span> min({MAX_DECAY_MONTHS}, max({MIN_DECAY_MONTHS}, {level})) = {} months</p>\n\
                 <p class=\"info\"><span>{expiry_label}</span> {}</p>",
                escape_html(name),
                time_element(revision_date),
                status.decay_months,
                time_element(availability_date),
            );
            html.push_str(
                "</section>\n<section class=\"disclaimer\">\n\
                 <p>* The times shown are local and are in MM/DD/YYYY format. \
                 Expiration dates are estimates we calculate using the Summoner Name Decay rules. \
                 To learn more, visit our <a href=\"/frequently-asked-questions\" class=\"link\">FAQ</a>.</p>\n",
            );
        }
        Verdict::NotFound { name } => {
            let _ = writeln!(
                html,
                "<h3>Summoner name &#39;{}&#39; is <span class=\"available\">available</span>.</h3>\n\
                 <p class=\"info\">We found no summoner who currently has this name.</p>",
                escape_html(name)
            );
            html.push_str(
                "</section>\n<section class=\"disclaimer\">\n\
                 <p>* The name could be invalid, blocked by Riot, or taken by a banned summoner.</p>\n",
            );
        }
    }

    html.push_str("</section>\n");
}

fn render_ad_slot(html: &mut String, slot_id: &str, config: &AdConfig) {
    let config_json = serde_json::to_string(config).unwrap_or_default();
    let _ = writeln!(
        html,
        "<div id=\"{slot_id}\" class=\"ad-slot\" data-ad-config=\"{}\"></div>",
        escape_html(&config_json)
    );
}

/// `MM/DD/YYYY hh:mm:ss AM` in local time, with the exact instant in `datetime`.
pub fn format_local(instant: &DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%m/%d/%Y %I:%M:%S %p")
        .to_string()
}

fn time_element(instant: &DateTime<Utc>) -> String {
    format!(
        "<time datetime=\"{}\">{}</time>",
        instant.to_rfc3339(),
        format_local(instant)
    )
}

/// Escapes HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
