use http::header::AUTHORIZATION;
use http::HeaderMap;

use super::errors::ExtractError;

/// Scheme for user-session credentials.
pub const BEARER_SCHEME: &str = "Bearer";

/// Scheme for static webhook keys.
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the bearer token from the `Authorization` header.
///
/// Requires the exact form `Bearer <token>`: one scheme word, one token,
/// nothing else. Pure parsing, no side effects.
///
/// # Errors
/// * `MissingHeader` - Header absent or empty
/// * `InvalidScheme` - Header present but scheme is not `Bearer`
/// * `MissingToken` - Scheme present but no token follows
/// * `MalformedHeader` - Extra segments or non-ASCII header value
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ExtractError> {
    scheme_credential(headers, BEARER_SCHEME)
}

/// Extract the static API key from the `Authorization` header.
///
/// Requires the exact form `ApiKey <key>`, with the same strictness rules
/// as [`bearer_token`].
pub fn api_key(headers: &HeaderMap) -> Result<&str, ExtractError> {
    scheme_credential(headers, API_KEY_SCHEME)
}

fn scheme_credential<'a>(
    headers: &'a HeaderMap,
    expected: &'static str,
) -> Result<&'a str, ExtractError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(ExtractError::MissingHeader)?
        .to_str()
        .map_err(|_| ExtractError::MalformedHeader)?;

    let mut segments = value.split_whitespace();

    let scheme = segments.next().ok_or(ExtractError::MissingHeader)?;
    if scheme != expected {
        return Err(ExtractError::InvalidScheme { expected });
    }

    let credential = segments.next().ok_or(ExtractError::MissingToken)?;
    if segments.next().is_some() {
        return Err(ExtractError::MalformedHeader);
    }

    Ok(credential)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().expect("valid header value"));
        headers
    }

    #[test]
    fn test_bearer_token_success() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(bearer_token(&headers), Ok("abc123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(ExtractError::MissingHeader));
    }

    #[test]
    fn test_bearer_token_empty_value() {
        let headers = headers_with("");
        assert_eq!(bearer_token(&headers), Err(ExtractError::MissingHeader));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with("Basic xyz");
        assert_eq!(
            bearer_token(&headers),
            Err(ExtractError::InvalidScheme { expected: "Bearer" })
        );
    }

    #[test]
    fn test_bearer_token_scheme_without_token() {
        let headers = headers_with("Bearer");
        assert_eq!(bearer_token(&headers), Err(ExtractError::MissingToken));
    }

    #[test]
    fn test_bearer_token_extra_segments() {
        let headers = headers_with("Bearer one two");
        assert_eq!(bearer_token(&headers), Err(ExtractError::MalformedHeader));
    }

    #[test]
    fn test_api_key_success() {
        let headers = headers_with("ApiKey f271c81ff7084ee5");
        assert_eq!(api_key(&headers), Ok("f271c81ff7084ee5"));
    }

    #[test]
    fn test_api_key_rejects_bearer_scheme() {
        let headers = headers_with("Bearer f271c81ff7084ee5");
        assert_eq!(
            api_key(&headers),
            Err(ExtractError::InvalidScheme { expected: "ApiKey" })
        );
    }
}
