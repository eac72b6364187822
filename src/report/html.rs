//! HTML document for a fetch result

use chrono::{DateTime, Local, TimeZone};

use crate::core::quote::FetchResult;

pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const NO_RATES_PLACEHOLDER: &str = "No filtered rates available.";
pub const NO_QUOTES_PLACEHOLDER: &str = "No quotes available.";

const STYLE: &str = r#"        body {
            font-family: Arial, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        .container {
            max-width: 900px;
            margin: auto;
            background: white;
            padding: 20px;
            border-radius: 5px;
            box-shadow: 0px 0px 10px rgba(0, 0, 0, 0.1);
        }
        table {
            width: 100%;
            border-collapse: collapse;
            margin-top: 20px;
        }
        th, td {
            padding: 10px;
            border: 1px solid #ddd;
            text-align: left;
        }
        th {
            background-color: #f4f4f4;
        }
        h1, h2 {
            margin-bottom: 10px;
        }
        p {
            margin: 5px 0;
        }"#;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Formats epoch seconds in local time, or "N/A" when out of range.
pub fn format_timestamp(timestamp: i64) -> String {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map_or_else(|| "N/A".to_string(), |dt| dt.format(DISPLAY_TIME_FORMAT).to_string())
}

fn push_rate_table<'a>(
    html: &mut String,
    rows: impl Iterator<Item = (&'a str, f64)>,
    placeholder: &str,
) {
    let mut rows = rows.peekable();
    if rows.peek().is_none() {
        html.push_str(&format!("\n        <p>{placeholder}</p>"));
        return;
    }

    html.push_str(
        r#"
        <table>
            <tr>
                <th>Currency Pair</th>
                <th>Exchange Rate</th>
            </tr>"#,
    );
    for (pair, rate) in rows {
        html.push_str(&format!(
            r#"
            <tr>
                <td>{}</td>
                <td>{rate:.6}</td>
            </tr>"#,
            escape_html(pair)
        ));
    }
    html.push_str("\n        </table>");
}

/// Renders `result` as a standalone HTML page. `generated_at` is the only
/// input besides the result, so the output is reproducible for a fixed clock.
pub fn render_document(result: &FetchResult, generated_at: DateTime<Local>) -> String {
    let mut html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Forex API Detailed Report</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class="container">
        <h1>Forex API Report</h1>
        <p><strong>Generated:</strong> {generated}</p>
        <p><strong>Success:</strong> {success}</p>
        <p><strong>Terms:</strong> <a href="{terms}" target="_blank" rel="noopener noreferrer">Terms of Service</a></p>
        <p><strong>Privacy:</strong> <a href="{privacy}" target="_blank" rel="noopener noreferrer">Privacy Policy</a></p>
        <p><strong>Source Currency:</strong> {source}</p>
        <p><strong>Timestamp:</strong> {timestamp}</p>

        <h2>Filtered Rates</h2>"#,
        generated = generated_at.format(DISPLAY_TIME_FORMAT),
        success = result.success,
        terms = escape_html(&result.terms),
        privacy = escape_html(&result.privacy),
        source = escape_html(&result.source),
        timestamp = format_timestamp(result.timestamp),
    );

    // BTreeMap iteration gives ascending pair order.
    push_rate_table(
        &mut html,
        result.rates.iter().map(|(pair, entry)| (pair.as_str(), entry.rate)),
        NO_RATES_PLACEHOLDER,
    );

    html.push_str("\n\n        <h2>All Quotes</h2>");
    push_rate_table(
        &mut html,
        result.all_quotes.iter().map(|(key, rate)| (key.as_str(), *rate)),
        NO_QUOTES_PLACEHOLDER,
    );

    html.push_str(
        r#"
    </div>
</body>
</html>
"#,
    );

    html
}
