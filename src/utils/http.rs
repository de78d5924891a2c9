//! Request inspection helpers used in access logging.

use actix_web::HttpRequest;

/// Client address as reported by forwarding headers, or the peer address
pub fn client_addr(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Value of the `User-Agent` header, if it is valid text
pub fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}
