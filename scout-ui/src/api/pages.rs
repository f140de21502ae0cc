//! Page rendering
//!
//! Both pages are server-rendered inline HTML. The search page drives the
//! refiner and search clients; the queue page reads the request store.
//! Every user action is a plain form post followed by a redirect back to
//! the page.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use tracing::warn;

use crate::db;
use crate::error::ApiResult;
use crate::services::ImageResult;
use crate::session::Session;
use crate::AppState;

/// Result-count bound passed to the search client
pub const RESULT_COUNT: u8 = 10;

const STYLE: &str = r#"
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            display: flex;
            min-height: 100vh;
        }
        .sidebar {
            width: 200px;
            background-color: #2a2a2a;
            border-right: 1px solid #3a3a3a;
            padding: 20px;
            flex-shrink: 0;
        }
        .sidebar h2 {
            font-size: 14px;
            color: #888;
            text-transform: uppercase;
            margin-bottom: 10px;
        }
        .sidebar a {
            display: block;
            padding: 8px 10px;
            color: #e0e0e0;
            text-decoration: none;
            border-radius: 4px;
            margin-bottom: 4px;
        }
        .sidebar a.active {
            background: #4a9eff;
            color: white;
            font-weight: 600;
        }
        .content {
            flex: 1;
            padding: 30px;
            max-width: 900px;
        }
        h1 {
            font-size: 26px;
            margin-bottom: 5px;
            color: #4a9eff;
        }
        .subtitle {
            color: #888;
            font-size: 16px;
            margin-bottom: 20px;
        }
        .notice, .warning, .info, .success {
            padding: 10px 14px;
            border-radius: 4px;
            margin-bottom: 15px;
        }
        .notice, .warning {
            background: #3a2f1a;
            border: 1px solid #f59e0b;
            color: #fbbf24;
        }
        .info {
            background: #1a2a3a;
            border: 1px solid #4a9eff;
            color: #9ecbff;
        }
        .success {
            background: #1a3a2a;
            border: 1px solid #10b981;
            color: #6ee7b7;
        }
        input[type="text"] {
            width: 100%;
            padding: 10px;
            background: #2a2a2a;
            border: 1px solid #3a3a3a;
            border-radius: 4px;
            color: #e0e0e0;
            margin-bottom: 10px;
        }
        .button {
            display: inline-block;
            padding: 10px 20px;
            background: #4a9eff;
            color: white;
            text-decoration: none;
            border: none;
            border-radius: 4px;
            margin: 5px 5px 5px 0;
            font-weight: 600;
            cursor: pointer;
            font-size: 14px;
        }
        .button:hover {
            background: #3a8eef;
        }
        .grid {
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 20px;
            margin-top: 20px;
        }
        .card {
            background: #2a2a2a;
            border: 1px solid #3a3a3a;
            border-radius: 4px;
            padding: 15px;
        }
        .card h5 {
            font-size: 15px;
            margin-bottom: 8px;
        }
        .card img {
            max-width: 100%;
            border-radius: 4px;
            margin-bottom: 8px;
        }
        .caption {
            color: #888;
            font-size: 13px;
            margin-bottom: 8px;
        }
        .queue-row {
            display: flex;
            gap: 20px;
            border-top: 1px solid #3a3a3a;
            padding: 15px 0;
        }
        .queue-row img {
            width: 150px;
            border-radius: 4px;
        }
        .queue-row h3 {
            margin-bottom: 5px;
        }
        .queue-row a {
            color: #4a9eff;
        }
"#;

/// Escape text for interpolation into HTML bodies and attribute values
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap page content in the shared chrome (sidebar, banners)
fn layout(title: &str, active: &str, placeholder_credentials: bool, content: &str) -> String {
    let search_class = if active == "search" { "active" } else { "" };
    let queue_class = if active == "queue" { "active" } else { "" };

    let credentials_banner = if placeholder_credentials {
        r#"<div class="warning">API keys not configured. Using dummy values for local dev.</div>"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="sidebar">
        <h2>Go to</h2>
        <a href="/" class="{search_class}">Search</a>
        <a href="/queue" class="{queue_class}">Print Queue</a>
    </div>
    <div class="content">
        {credentials_banner}
        {content}
    </div>
</body>
</html>"#,
        title = escape(title),
        style = STYLE,
        search_class = search_class,
        queue_class = queue_class,
        credentials_banner = credentials_banner,
        content = content,
    )
}

/// One result card in the two-column grid
fn result_card(result: &ImageResult) -> String {
    let thumbnail_html = match &result.thumbnail {
        Some(src) => format!(r#"<img src="{}" alt="">"#, escape(src)),
        None => r#"<p class="caption">No image available</p>"#.to_string(),
    };

    format!(
        r#"<div class="card">
            <h5>{title}</h5>
            {thumbnail_html}
            <p class="caption">Source: {source}</p>
            <form method="post" action="/requests">
                <input type="hidden" name="title" value="{title}">
                <input type="hidden" name="url" value="{url}">
                <input type="hidden" name="thumbnail" value="{thumbnail}">
                <input type="hidden" name="source" value="{source}">
                <button type="submit" class="button">Request This</button>
            </form>
        </div>"#,
        title = escape(&result.title),
        url = escape(&result.link),
        thumbnail = escape(result.thumbnail.as_deref().unwrap_or("")),
        source = escape(&result.display_source),
    )
}

/// GET /
///
/// Search page. Renders the idea form; when the session holds a refined
/// query, also runs the image search and renders the result grid.
pub async fn search_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = Session::resolve(&headers);
    let search_query = state.sessions.snapshot(session.id).search_query;

    let mut content = String::new();
    content.push_str("<h1>Junior Print Scout 🤖</h1>");
    content.push_str(r#"<p class="subtitle">What do you want to build today?</p>"#);

    if let Some(notice) = state.sessions.take_notice(session.id) {
        content.push_str(&format!(
            r#"<div class="notice">{}</div>"#,
            escape(&notice)
        ));
    }

    content.push_str(
        r#"<form method="post" action="/search/refine">
            <label for="idea">Tell me what you're looking for!</label>
            <input type="text" id="idea" name="idea" value="">
            <button type="submit" class="button">Ask Assistant</button>
            <a href="/" class="button">Search Now!</a>
        </form>"#,
    );

    if !search_query.is_empty() {
        content.push_str(&format!(
            r#"<div class="info">Search term: <strong>{}</strong></div>"#,
            escape(&search_query)
        ));

        match state.search.search(&search_query, RESULT_COUNT).await {
            Ok(results) if results.is_empty() => {
                content.push_str(&format!(
                    r#"<div class="warning">Oops! Couldn't find anything for '{}'. Try a different search!</div>"#,
                    escape(&search_query)
                ));
            }
            Ok(results) => {
                content.push_str(r#"<div class="grid">"#);
                for result in &results {
                    content.push_str(&result_card(result));
                }
                content.push_str("</div>");
            }
            Err(e) => {
                warn!("Image search failed: {}", e);
                content.push_str(
                    r#"<div class="warning">Search is unavailable right now. Try again in a bit.</div>"#,
                );
            }
        }
    }

    let html = layout(
        "Junior Print Scout",
        "search",
        state.placeholder_credentials,
        &content,
    );
    session.apply(Html(html).into_response())
}

/// GET /queue
///
/// Print Queue page. Lists pending requests oldest first, each with a
/// "Mark as Printed" action.
pub async fn queue_page(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let session = Session::resolve(&headers);
    let pending = db::list_pending(&state.db).await?;

    let mut content = String::new();
    content.push_str("<h1>Print Queue 👨‍👧‍👦</h1>");

    if pending.is_empty() {
        content.push_str(r#"<div class="success">The print queue is empty! 🎉</div>"#);
    } else {
        for request in &pending {
            let thumbnail_html = match &request.thumbnail_url {
                Some(src) => format!(r#"<img src="{}" alt="">"#, escape(src)),
                None => String::new(),
            };

            content.push_str(&format!(
                r#"<div class="queue-row">
                    <div>{thumbnail_html}</div>
                    <div>
                        <h3>{title}</h3>
                        <p><a href="{url}">Link to model</a></p>
                        <form method="post" action="/queue/{id}/printed">
                            <button type="submit" class="button">Mark as Printed</button>
                        </form>
                    </div>
                </div>"#,
                thumbnail_html = thumbnail_html,
                title = escape(&request.title),
                url = escape(&request.url),
                id = request.id,
            ));
        }
    }

    let html = layout(
        "Print Queue",
        "queue",
        state.placeholder_credentials,
        &content,
    );
    Ok(session.apply(Html(html).into_response()))
}
