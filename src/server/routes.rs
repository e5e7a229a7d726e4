use tracing::warn;

use crate::data::CountryTable;
use crate::server::api::{self, ApiError, Query};

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(table: &CountryTable, method: &str, target: &str, body: &str) -> HttpResponse {
    let (path, raw_query) = target.split_once('?').unwrap_or((target, ""));
    let query = Query::parse(raw_query);

    let result = match (method, path) {
        ("GET", "/") => {
            return HttpResponse {
                status_code: 200,
                status_text: "OK",
                content_type: "text/html; charset=utf-8",
                body: index_html(),
            }
        }
        ("GET", "/api/health") => api::health_payload(table),
        ("GET", "/api/countries") => api::countries_payload(table),
        ("GET", path) if path.starts_with("/api/countries/") => {
            api::country_payload(table, path.trim_start_matches("/api/countries/"))
        }
        ("GET", path) if path.starts_with("/api/views/") => {
            api::view_payload(table, path.trim_start_matches("/api/views/"), &query)
        }
        ("GET", "/api/projections") => api::projections_payload(table),
        ("GET", "/api/equipment") => api::equipment_payload(table, &query),
        ("GET", "/api/equipment/history") => api::equipment_history_payload(table, &query),
        ("GET", "/api/rankings") => api::rankings_payload(table, &query),
        ("POST", "/api/refresh") => api::refresh_payload(),
        ("POST", "/api/export") => api::export_payload(table, body),
        _ => return error_response(404, "Not Found", "Route not found"),
    };

    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => api_error_response(method, path, &err),
    }
}

fn api_error_response(method: &str, path: &str, err: &ApiError) -> HttpResponse {
    let (status_code, status_text) = err.status();
    warn!(method, path, status = status_code, "request failed: {err}");
    error_response(status_code, status_text, &err.to_string())
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>milstat API</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    code { background: #f2f2f2; padding: 1px 4px; border-radius: 3px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>milstat local API</h1>
  <ul>
    <li><code>GET /api/countries</code></li>
    <li><code>GET /api/views/{overview|budget|personnel|equipment|nuclear|history-budget|history-nukes}?countries=China,Russia</code></li>
    <li><code>GET /api/projections</code></li>
    <li><code>GET /api/equipment?countries=China&amp;mode=randomized&amp;seed=7</code></li>
    <li><code>GET /api/equipment/history?country=China&amp;category=tanks</code></li>
    <li><code>GET /api/rankings?category=tanks</code></li>
    <li><code>POST /api/refresh</code>, <code>POST /api/export</code></li>
  </ul>
  <button id="overview-btn">Overview: United States, China, Russia</button>
  <pre id="output">Ready.</pre>
  <script>
    const output = document.getElementById('output');
    document.getElementById('overview-btn').addEventListener('click', async () => {
      output.textContent = 'Loading…';
      const response = await fetch('/api/views/overview?countries=United+States,China,Russia');
      output.textContent = 'HTTP ' + response.status + '\n' + await response.text();
    });
  </script>
</body>
</html>
"#
    .to_string()
}
