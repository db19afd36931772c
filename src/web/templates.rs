use chrono::{Datelike, Utc};

use crate::dashboard::{Dashboard, RetrievalState};

pub const CURRENT_VIEW: &str = "current";

const PAGE_BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f3f4f6; color: #1f2937; }
        main { padding: 2rem 1.5rem; max-width: 1120px; margin: 0 auto; box-sizing: border-box; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e5e7eb; padding: 1.5rem; box-shadow: 0 10px 30px rgba(15, 23, 42, 0.06); }
        label { display: block; font-size: 0.9rem; font-weight: 600; color: #374151; }
        input { width: 100%; padding: 0.7rem; margin-top: 0.4rem; border-radius: 8px; border: 1px solid #d1d5db; background: #ffffff; color: #111827; font-size: 0.95rem; box-sizing: border-box; }
        input:focus { outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.15); }
        button, .button { display: inline-flex; align-items: center; padding: 0.7rem 1.1rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; font-size: 0.95rem; cursor: pointer; text-decoration: none; }
        button:hover, .button:hover { background: #1d4ed8; }
        .flash { padding: 0.9rem 1.2rem; border-radius: 10px; margin-bottom: 1.25rem; font-weight: 600; border: 1px solid transparent; text-align: center; }
        .flash.success { background: #ecfdf3; border-color: #bbf7d0; color: #166534; }
        .flash.error { background: #fef2f2; border-color: #fecaca; color: #b91c1c; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #9ca3af; }
"#;

const DASHBOARD_STYLES: &str = r#"
        .header-bar { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1.5rem; }
        .header-bar h1 { margin: 0; font-size: 1.9rem; }
        .logout-form button { background: #ef4444; }
        .logout-form button:hover { background: #b91c1c; }
        .filters { display: flex; align-items: flex-end; gap: 1rem; flex-wrap: wrap; margin-bottom: 1.5rem; }
        .filters .field { min-width: 220px; }
        .export-link { background: #16a34a; }
        .export-link:hover { background: #15803d; }
        .loading { text-align: center; color: #6b7280; }
        table { width: 100%; border-collapse: collapse; background: #ffffff; border-radius: 12px; overflow: hidden; border: 1px solid #e5e7eb; }
        th, td { padding: 0.8rem 1.25rem; border-bottom: 1px solid #e5e7eb; text-align: left; white-space: nowrap; }
        th { background: #f9fafb; color: #6b7280; font-size: 0.75rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.05em; }
        td.name { font-weight: 600; color: #111827; }
        td.muted { color: #6b7280; }
        .notice-backdrop { position: fixed; inset: 0; background: rgba(17, 24, 39, 0.45); display: flex; align-items: center; justify-content: center; }
        .notice { background: #ffffff; border-radius: 12px; padding: 1.75rem 2rem; max-width: 360px; text-align: center; box-shadow: 0 20px 50px rgba(15, 23, 42, 0.25); }
        .notice p { margin: 0 0 1.25rem; font-weight: 600; }
"#;

/// What the login form shows; fields are echoed back after a failed attempt.
#[derive(Default)]
pub struct LoginView<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub error: Option<&'a str>,
    pub flash: Option<&'a str>,
}

pub fn render_login_page(view: &LoginView<'_>) -> String {
    let footer = render_footer();
    let flash = view
        .flash
        .map(|message| format!(r#"<div class="flash success">{}</div>"#, escape_html(message)))
        .unwrap_or_default();
    let error = view
        .error
        .map(|message| format!(r#"<div class="flash error">{}</div>"#, escape_html(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Researcher Portal</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
{styles}
        body {{ display: flex; align-items: center; justify-content: center; min-height: 100vh; }}
        main {{ width: 100%; max-width: 440px; }}
        h1 {{ margin: 0 0 1.5rem; font-size: 1.8rem; text-align: center; }}
        label {{ margin-top: 1.1rem; }}
        button {{ margin-top: 1.75rem; width: 100%; justify-content: center; }}
    </style>
</head>
<body>
    <main>
        {flash}
        <section class="panel">
            <h1>Researcher Portal</h1>
            <form method="post" action="/login">
                <label for="username">Username</label>
                <input id="username" name="username" type="text" value="{username}" placeholder="researcher1" required>
                <label for="password">Password</label>
                <input id="password" name="password" type="password" value="{password}" placeholder="testpassword" required>
                {error}
                <button type="submit">Sign In</button>
            </form>
        </section>
        {footer}
    </main>
</body>
</html>"#,
        styles = PAGE_BASE_STYLES,
        flash = flash,
        username = escape_html(view.username),
        password = escape_html(view.password),
        error = error,
        footer = footer,
    )
}

/// Render the dashboard for the given workspace. `notice` is shown as a
/// blocking dialog over the page.
pub fn render_dashboard_page(dashboard: &Dashboard, notice: Option<&str>) -> String {
    let criteria = dashboard.criteria();
    let body = render_retrieval_state(dashboard.state());
    let notice_html = notice
        .map(|message| {
            format!(
                r#"<div class="notice-backdrop" role="alertdialog" aria-modal="true"><div class="notice"><p>{message}</p><a class="button" href="/dashboard">OK</a></div></div>"#,
                message = escape_html(message),
            )
        })
        .unwrap_or_default();
    let footer = render_footer();
    // A newer attempt is still in flight; poll until it lands.
    let refresh = if dashboard.state().is_loading() {
        format!(r#"<meta http-equiv="refresh" content="1;url=/dashboard?view={CURRENT_VIEW}">"#)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Researcher Dashboard</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    {refresh}
    <style>
{base_styles}
{dashboard_styles}
    </style>
</head>
<body data-state="{state}">
    <main>
        <div class="header-bar">
            <h1>Researcher Dashboard</h1>
            <form class="logout-form" method="post" action="/logout">
                <button type="submit">Log Out</button>
            </form>
        </div>
        <section class="panel">
            <form class="filters" method="post" action="/dashboard">
                <div class="field">
                    <label for="source">Source (State)</label>
                    <input id="source" name="source" type="text" value="{source}" placeholder="e.g., Himachal Pradesh">
                </div>
                <div class="field">
                    <label for="min_records">Min. Institutions</label>
                    <input id="min_records" name="min_records" type="number" value="{min_records}" placeholder="e.g., 1000">
                </div>
                <button type="submit">Apply Filters</button>
                <a class="button export-link" href="/dashboard/export">Export to CSV</a>
            </form>
        </section>
        {body}
        {footer}
    </main>
    {notice_html}
</body>
</html>"#,
        refresh = refresh,
        base_styles = PAGE_BASE_STYLES,
        dashboard_styles = DASHBOARD_STYLES,
        state = dashboard.state().as_str(),
        source = escape_html(criteria.source().unwrap_or_default()),
        min_records = escape_html(criteria.min_records().unwrap_or_default()),
        body = body,
        footer = footer,
        notice_html = notice_html,
    )
}

fn render_retrieval_state(state: &RetrievalState) -> String {
    match state {
        RetrievalState::Idle => String::new(),
        RetrievalState::Loading => r#"<p class="loading">Loading data...</p>"#.to_string(),
        RetrievalState::Error(message) => {
            format!(r#"<div class="flash error">{}</div>"#, escape_html(message))
        }
        RetrievalState::Success(records) => {
            let rows = records
                .iter()
                .map(|record| {
                    format!(
                        r#"<tr><td class="name">{name}</td><td class="muted">{source}</td><td class="muted">{count}</td></tr>"#,
                        name = escape_html(&record.name),
                        source = escape_html(&record.source),
                        count = record.record_count,
                    )
                })
                .collect::<String>();

            format!(
                r#"<table>
            <thead>
                <tr><th>Name (District)</th><th>Source (State)</th><th>Total Institutions</th></tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>"#
            )
        }
    }
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} Researcher Portal</footer>"#,
        year = current_year
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
