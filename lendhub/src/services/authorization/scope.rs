use axum::extract::Request;

/// Header carrying an explicit location context
pub const LOCATION_HEADER: &str = "x-lendhub-location";

/// Signature of a route-level scope override. Takes precedence over the
/// request-attached location context.
pub type ScopeResolverFn = fn(&Request) -> Option<String>;

/// Typed location context, built once per request by the context
/// middleware and read by the guards. A pure function of request state.
///
/// Precedence: path segment after `locations` > `location` query
/// parameter > `X-Lendhub-Location` header. `None` means the check runs
/// without a location constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationContext {
    pub location: Option<String>,
}

impl LocationContext {
    pub fn from_request(req: &Request) -> Self {
        let location = location_from_path(req.uri().path())
            .or_else(|| location_from_query(req.uri().query()))
            .or_else(|| location_from_header(req));
        LocationContext { location }
    }
}

/// Route-level resolver for routes nested under
/// `/locations/{location_id}/...`
pub fn resolve_location_from_path(req: &Request) -> Option<String> {
    location_from_path(req.uri().path())
}

/// Extract the location id from a path containing a `/locations/{id}`
/// pair.
fn location_from_path(path: &str) -> Option<String> {
    let mut parts = path.trim_start_matches('/').split('/');
    while let Some(part) = parts.next() {
        if part == "locations" {
            return match parts.next() {
                Some(id) if !id.is_empty() => Some(id.to_string()),
                _ => None,
            };
        }
    }
    None
}

fn location_from_query(query: Option<&str>) -> Option<String> {
    let query = query?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == "location" && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn location_from_header(req: &Request) -> Option<String> {
    req.headers()
        .get(LOCATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    fn request(uri: &str, location_header: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(value) = location_header {
            builder = builder.header(LOCATION_HEADER, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_location_from_path() {
        assert_eq!(
            location_from_path("/api/v1/authenticated/locations/loc-1/items"),
            Some("loc-1".to_string())
        );
        assert_eq!(
            location_from_path("/api/v1/authenticated/locations/loc-1"),
            Some("loc-1".to_string())
        );
        assert_eq!(location_from_path("/api/v1/authenticated/items"), None);
        assert_eq!(location_from_path("/locations"), None);
    }

    #[test]
    fn test_path_takes_precedence_over_query_and_header() {
        let req = request(
            "/api/v1/authenticated/locations/loc-1/items?location=loc-2",
            Some("loc-3"),
        );
        assert_eq!(
            LocationContext::from_request(&req).location,
            Some("loc-1".to_string())
        );
    }

    #[test]
    fn test_query_beats_header() {
        let req = request("/api/v1/authenticated/items?location=loc-2", Some("loc-3"));
        assert_eq!(
            LocationContext::from_request(&req).location,
            Some("loc-2".to_string())
        );
    }

    #[test]
    fn test_header_fallback() {
        let req = request("/api/v1/authenticated/items", Some("loc-3"));
        assert_eq!(
            LocationContext::from_request(&req).location,
            Some("loc-3".to_string())
        );
    }

    #[test]
    fn test_no_location() {
        let req = request("/api/v1/authenticated/items", None);
        assert_eq!(LocationContext::from_request(&req).location, None);
    }
}
