//! Standalone HTML report.

use chrono::NaiveDateTime;
use ironhtml::typed::{Document, Element};
use ironhtml_elements::{Body, Div, Head, Html, Meta, Span, Style, Title, H1, H2, P};

use querydiff_core::{ComparisonReport, Record};

use crate::cells::{cell, html_escape, key_label, seconds, Status};

/// Rows shown per table in the HTML report.
pub const HTML_ROW_LIMIT: usize = 50;

const CSS: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; \
line-height: 1.6; color: #333; max-width: 1200px; margin: 0 auto; \
padding: 20px; background-color: #f5f7fa; }\n\
.report-header { background-color: white; padding: 30px; border-radius: 8px; \
box-shadow: 0 2px 4px rgba(0,0,0,0.1); margin-bottom: 30px; }\n\
h1 { color: #1a2b3c; margin: 0 0 10px 0; display: inline-block; }\n\
.report-meta { color: #6c757d; font-size: 14px; margin-top: 10px; }\n\
.status-badge { display: inline-block; padding: 8px 16px; border-radius: 20px; \
font-weight: 600; color: white; margin-left: 20px; }\n\
.summary-cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); \
gap: 20px; margin-bottom: 30px; }\n\
.card { background: white; padding: 20px; border-radius: 8px; \
box-shadow: 0 2px 4px rgba(0,0,0,0.1); border-left: 4px solid #28a745; }\n\
.card.mismatch { border-left-color: #dc3545; }\n\
.card.only1 { border-left-color: #fd7e14; }\n\
.card.only2 { border-left-color: #17a2b8; }\n\
.card-value { font-size: 32px; font-weight: 700; margin: 5px 0; }\n\
.card-label { color: #6c757d; font-size: 14px; text-transform: uppercase; }\n\
.section { background: white; padding: 20px; border-radius: 8px; margin-bottom: 30px; \
box-shadow: 0 2px 4px rgba(0,0,0,0.1); overflow-x: auto; }\n\
table { border-collapse: collapse; width: 100%; font-size: 14px; }\n\
th, td { border: 1px solid #dee2e6; padding: 6px 10px; text-align: left; }\n\
th { background-color: #f8f9fa; }\n\
td.diff { background-color: #fff3cd; }\n\
.muted { color: #6c757d; }";

/// Renders the report as a self-contained HTML page.
#[must_use]
pub fn to_html(report: &ComparisonReport, generated_at: NaiveDateTime) -> String {
    let title = format!("SQL Comparison Report - {}", generated_at.format("%Y-%m-%d"));
    let content = render_content(report, generated_at);

    Document::new()
        .doctype()
        .root::<Html, _>(|html_el| {
            html_el
                .attr("lang", "en")
                .child::<Head, _>(|head| {
                    head.child::<Meta, _>(|m| m.attr("charset", "UTF-8"))
                        .child::<Title, _>(|t| t.text(&title))
                        .child::<Style, _>(|s| s.raw(CSS))
                })
                .child::<Body, _>(|body| body.raw(&content))
        })
        .build()
}

fn render_content(report: &ComparisonReport, generated_at: NaiveDateTime) -> String {
    let summary = &report.summary;
    let rate = summary.match_rate();
    let status = Status::from_rate(rate);
    let meta = format!(
        "Generated {} | Execution time {}s | Match rate {rate:.1}%",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        seconds(summary),
    );
    let badge_style = format!("background-color: {}", status.color());

    let mut html = String::new();
    Element::<Div>::new()
        .class("report-header")
        .child::<H1, _>(|h| h.text("SQL Query Comparison Report"))
        .child::<Span, _>(|s| {
            s.class("status-badge")
                .attr("style", &badge_style)
                .text(status.label())
        })
        .child::<P, _>(|p| p.class("report-meta").text(&meta))
        .render_to(&mut html);

    let mut cards = String::new();
    for (class, label, value) in [
        ("card", "Total Rows (Query 1)", summary.total_rows_query1),
        ("card", "Total Rows (Query 2)", summary.total_rows_query2),
        ("card match", "Matches", summary.matches),
        ("card mismatch", "Mismatches", summary.mismatches),
        ("card only1", "Only in Query 1", summary.only_in_query1),
        ("card only2", "Only in Query 2", summary.only_in_query2),
    ] {
        let value = value.to_string();
        Element::<Div>::new()
            .class(class)
            .child::<Div, _>(|d| d.class("card-label").text(label))
            .child::<Div, _>(|d| d.class("card-value").text(&value))
            .render_to(&mut cards);
    }
    Element::<Div>::new()
        .class("summary-cards")
        .raw(&cards)
        .render_to(&mut html);

    if !report.mismatches.is_empty() {
        section(&mut html, "Mismatches", summary.mismatches, &mismatch_table(report));
    }
    if !report.only_in_query1.is_empty() {
        section(
            &mut html,
            "Only in Query 1",
            summary.only_in_query1,
            &record_table(&report.only_in_query1),
        );
    }
    if !report.only_in_query2.is_empty() {
        section(
            &mut html,
            "Only in Query 2",
            summary.only_in_query2,
            &record_table(&report.only_in_query2),
        );
    }
    if !report.matches.is_empty() {
        section(&mut html, "Matches", summary.matches, &record_table(&report.matches));
    }

    html
}

fn section(html: &mut String, heading: &str, total: usize, table: &str) {
    let shown = total.min(HTML_ROW_LIMIT);
    let note = if shown < total {
        format!("Showing {shown} of {total} rows")
    } else {
        format!("{total} rows")
    };
    Element::<Div>::new()
        .class("section")
        .child::<H2, _>(|h| h.text(heading))
        .child::<P, _>(|p| p.class("muted").text(&note))
        .raw(table)
        .render_to(html);
}

fn table(headers: &[String], rows: &[String]) -> String {
    let headers: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .collect();
    format!(
        "<table><thead><tr>{headers}</tr></thead><tbody>{rows}</tbody></table>",
        rows = rows.concat()
    )
}

fn record_table(records: &[Record]) -> String {
    let headers: Vec<String> = records
        .first()
        .map(|r| r.columns().map(str::to_string).collect())
        .unwrap_or_default();
    let rows: Vec<String> = records
        .iter()
        .take(HTML_ROW_LIMIT)
        .map(|record| {
            let cells: String = record
                .iter()
                .map(|(_, value)| format!("<td>{}</td>", html_escape(&cell(value))))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    table(&headers, &rows)
}

fn mismatch_table(report: &ComparisonReport) -> String {
    let headers = ["Key", "Column", "Query 1", "Query 2"].map(String::from);
    let mut rows = Vec::new();
    for mismatch in report.mismatches.iter().take(HTML_ROW_LIMIT) {
        let key = html_escape(&key_label(&mismatch.key));
        for (column, diff) in mismatch.differences.iter() {
            rows.push(format!(
                "<tr><td>{key}</td><td>{}</td><td class=\"diff\">{}</td><td class=\"diff\">{}</td></tr>",
                html_escape(column),
                html_escape(&cell(&diff.query1)),
                html_escape(&cell(&diff.query2)),
            ));
        }
    }
    table(&headers, &rows)
}
