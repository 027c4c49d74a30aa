//! W3C trace context pulled from incoming request headers.

use opentelemetry::{
    Context, global,
    propagation::{Extractor, TextMapPropagator},
    trace::TraceContextExt as _,
};
use salvo::http::{HeaderMap, HeaderName};

/// The caller's span context, if the request carried a valid one.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| remote_parent(propagator, headers))
}

fn remote_parent(propagator: &dyn TextMapPropagator, headers: &HeaderMap) -> Option<Context> {
    // Start from an empty context so a request without trace headers never
    // attaches to whatever span happens to be active in this process.
    let context = propagator.extract_with_context(&Context::new(), &Headers(headers));

    let valid = context.span().span_context().is_valid();

    valid.then_some(context)
}

#[derive(Debug)]
struct Headers<'a>(&'a HeaderMap);

impl Extractor for Headers<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use salvo::http::HeaderValue;

    use super::*;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn headers(traceparent: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(value) = traceparent {
            headers.insert("traceparent", HeaderValue::from_static(value));
        }

        headers
    }

    #[test]
    fn valid_traceparent_becomes_remote_parent() {
        let parent = remote_parent(&TraceContextPropagator::new(), &headers(Some(TRACEPARENT)))
            .map(|context| {
                let span = context.span();
                let span_context = span.span_context();

                (span_context.is_remote(), span_context.trace_id().to_string())
            });

        assert_eq!(
            parent,
            Some((true, "4bf92f3577b34da6a3ce929d0e0e4736".to_string()))
        );
    }

    #[test]
    fn missing_or_malformed_headers_yield_no_parent() {
        let propagator = TraceContextPropagator::new();

        assert!(remote_parent(&propagator, &headers(None)).is_none());
        assert!(remote_parent(&propagator, &headers(Some("00-not-a-trace-01"))).is_none());
    }
}
