//! HTML rendering of a session
//!
//! `render_page` is a pure function of the `SessionView` it is given.

use crate::models::{Notification, PodSummary};
use crate::session::SessionView;

pub const NO_PODS_MESSAGE: &str = "No pods found or an error occurred.";
pub const NO_IP_PLACEHOLDER: &str = "<none>";

/// Render the full viewer page
pub fn render_page(view: &SessionView) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Kubernetes Pod Viewer</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            background: #f5f5f5;
            padding: 20px;
        }}
        .container {{ max-width: 1200px; margin: 0 auto; }}
        h2 {{ color: #326ce5; margin-bottom: 5px; }}
        .subtitle {{ color: #666; margin-bottom: 20px; }}
        pre {{
            background: white;
            padding: 12px 15px;
            border-radius: 8px;
            margin-bottom: 15px;
            white-space: pre-wrap;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }}
        .config-status.error {{ color: #721c24; background: #f8d7da; }}
        .notification.success {{ color: #155724; background: #d4edda; }}
        .notification.error {{ color: #721c24; background: #f8d7da; }}
        button {{
            background: #326ce5;
            color: white;
            border: none;
            padding: 10px 20px;
            border-radius: 6px;
            font-size: 1em;
            cursor: pointer;
            margin-bottom: 15px;
        }}
        .pods-list {{
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
            gap: 15px;
        }}
        .pod-item {{
            background: white;
            border-radius: 8px;
            padding: 15px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
            word-break: break-all;
        }}
        .no-ip {{ color: #999; font-style: italic; }}
        .no-pods {{ color: #666; padding: 20px; text-align: center; }}
        .meta {{ color: #666; font-size: 0.85em; margin-bottom: 10px; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Kubernetes Pod Viewer</h2>
        <p class="subtitle">Displays all pods across all namespaces with their IPs.</p>
        <pre class="config-status{config_class}">{config_status}</pre>
        <form method="post" action="/sessions/{session_id}/refresh">
            <button type="submit">Refresh Pods</button>
        </form>
        {notification}
        {meta}
        {pods}
    </div>
</body>
</html>"#,
        config_class = if view.config_status.loaded { "" } else { " error" },
        config_status = escape_html(&view.config_status.message),
        session_id = view.id,
        notification = render_notification(view.notification.as_ref()),
        meta = render_meta(view),
        pods = render_pods(&view.pods),
    )
}

fn render_notification(notification: Option<&Notification>) -> String {
    match notification {
        Some(n) => format!(
            "<pre class=\"notification {}\">{}</pre>",
            n.kind,
            escape_html(&n.message)
        ),
        None => "<pre class=\"notification\"></pre>".to_string(),
    }
}

fn render_meta(view: &SessionView) -> String {
    match view.refreshed_at {
        Some(at) => format!(
            "<div class=\"meta\">{} {}, last updated {}</div>",
            view.pod_count,
            if view.pod_count == 1 { "pod" } else { "pods" },
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => String::new(),
    }
}

/// Pod cards, or the empty indicator when there are none
pub fn render_pods(pods: &[PodSummary]) -> String {
    if pods.is_empty() {
        return format!("<div class=\"no-pods\">{}</div>", NO_PODS_MESSAGE);
    }

    let cards = pods
        .iter()
        .map(render_pod_card)
        .collect::<Vec<_>>()
        .join("\n");

    format!("<div class=\"pods-list\">\n{}\n</div>", cards)
}

fn render_pod_card(pod: &PodSummary) -> String {
    let ip = if pod.has_ip() {
        escape_html(&pod.ip)
    } else {
        format!("<span class=\"no-ip\">{}</span>", escape_html(NO_IP_PLACEHOLDER))
    };

    format!(
        concat!(
            "<div class=\"pod-item\"><strong>Pod Name: {}</strong>",
            "<div>Namespace: {}</div><div>Pod IP: {}</div></div>"
        ),
        escape_html(&pod.name),
        escape_html(&pod.namespace),
        ip
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
