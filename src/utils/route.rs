//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Route pattern the request matched, e.g. `/cep/{cep}`
///
/// Labels built from the pattern keep metric cardinality bounded no
/// matter how many distinct postal codes are queried. Unmatched requests
/// collapse to `/unknown`.
pub fn route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unknown".to_string())
}
