//! HTTP span helpers.

use uuid::Uuid;

const PAYMENT_REFERENCE_PREFIX: &str = "chk_";

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = route_template(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Replace identifiers in `path` with placeholders to keep span names and
/// metric labels low-cardinality.
fn route_template(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else if segment.starts_with(PAYMENT_REFERENCE_PREFIX) {
                "{reference}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}
