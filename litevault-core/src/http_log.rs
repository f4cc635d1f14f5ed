// litevault-core/src/http_log.rs
//! Request/response log lines that carry no headers or bodies.
//!
//! The HTTP client logs one line per response built from these helpers:
//! method, path, a URL label, status, latency and a trace id if the server
//! sent one. The line still goes through the redacting logger.

use std::collections::HashMap;

/// Response headers checked, in order, for a trace id.
pub const TRACE_ID_HEADERS: [&str; 9] = [
    "x-request-id",
    "x-correlation-id",
    "x-trace-id",
    "trace-id",
    "x-amzn-trace-id",
    "x-b3-traceid",
    "x-cloud-trace-context",
    "clerk-trace-id",
    "clerk_trace_id",
];

/// Formats `method=.. path=.. [url=..] status=.. [latency_ms=..] [trace_id=..] [error=..]`.
pub fn build_message(
    method: &str,
    path: &str,
    url: Option<&str>,
    status: &str,
    latency_ms: Option<u64>,
    trace_id: Option<&str>,
    error: Option<&str>,
) -> String {
    let mut message = format!("method={} path={}", method, path);
    if let Some(url) = url {
        message.push_str(&format!(" url={}", url));
    }
    message.push_str(&format!(" status={}", status));
    if let Some(latency) = latency_ms {
        message.push_str(&format!(" latency_ms={}", latency));
    }
    if let Some(trace_id) = trace_id {
        message.push_str(&format!(" trace_id={}", trace_id));
    }
    if let Some(error) = error {
        message.push_str(&format!(" error={}", error));
    }
    message
}

/// `scheme://host[:port]path`, leaving out the default ports 80 and 443.
pub fn build_url_label(scheme: &str, host: &str, port: u16, path: &str) -> String {
    match port {
        80 | 443 => format!("{}://{}{}", scheme, host, path),
        _ => format!("{}://{}:{}{}", scheme, host, port, path),
    }
}

/// First trace id found among [`TRACE_ID_HEADERS`]. Header names are
/// matched case-insensitively.
pub fn find_trace_id(headers: &HashMap<String, String>) -> Option<String> {
    TRACE_ID_HEADERS.iter().find_map(|candidate| {
        headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(candidate))
            .map(|(_, value)| value.clone())
    })
}
