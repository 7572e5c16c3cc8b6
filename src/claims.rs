//! Registered claims and expiration

use miniserde::json::{Number, Object, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Read access to the registered claims of RFC 7519 Section 4.1
///
/// Claims are only exposed here; `aud` and `iss` are never enforced.
pub trait StandardClaims {
    fn issuer(&self) -> Option<&str>;
    fn subject(&self) -> Option<&str>;
    /// `aud` as a list, whether it was a single string or an array
    fn audience(&self) -> Vec<&str>;
    fn expiration(&self) -> Option<f64>;
    fn not_before(&self) -> Option<f64>;
    fn issued_at(&self) -> Option<f64>;
    fn jwt_id(&self) -> Option<&str>;
}

impl StandardClaims for Object {
    fn issuer(&self) -> Option<&str> {
        string_claim(self, "iss")
    }

    fn subject(&self) -> Option<&str> {
        string_claim(self, "sub")
    }

    fn audience(&self) -> Vec<&str> {
        match self.get("aud") {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|value| match value {
                    Value::String(aud) => Some(aud.as_str()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn expiration(&self) -> Option<f64> {
        numeric_claim(self, "exp")
    }

    fn not_before(&self) -> Option<f64> {
        numeric_claim(self, "nbf")
    }

    fn issued_at(&self) -> Option<f64> {
        numeric_claim(self, "iat")
    }

    fn jwt_id(&self) -> Option<&str> {
        string_claim(self, "jti")
    }
}

fn string_claim<'a>(claims: &'a Object, name: &str) -> Option<&'a str> {
    match claims.get(name) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

/// A NumericDate claim. Anything that is not a JSON number counts as absent.
pub(crate) fn numeric_claim(claims: &Object, name: &str) -> Option<f64> {
    match claims.get(name) {
        Some(Value::Number(Number::U64(n))) => Some(*n as f64),
        Some(Value::Number(Number::I64(n))) => Some(*n as f64),
        Some(Value::Number(Number::F64(n))) if n.is_finite() => Some(*n),
        _ => None,
    }
}

/// Whether `exp` lies in the past
///
/// A payload without a numeric `exp` never expires. `exp` equal to the
/// current second is still valid.
pub fn is_expired(claims: &Object) -> bool {
    is_expired_at(claims, current_timestamp())
}

/// [`is_expired`] against a fixed clock
pub fn is_expired_at(claims: &Object, now: u64) -> bool {
    claims
        .expiration()
        .is_some_and(|exp| exp < now as f64)
}

/// Get current Unix timestamp
pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(json: &str) -> Object {
        miniserde::json::from_str(json).unwrap()
    }

    #[test]
    fn test_no_exp_never_expires() {
        assert!(!is_expired_at(&claims(r#"{"sub":"1234567890"}"#), u64::MAX));
    }

    #[test]
    fn test_exp_boundary() {
        let payload = claims(r#"{"exp":1000}"#);
        assert!(!is_expired_at(&payload, 999));
        assert!(!is_expired_at(&payload, 1000));
        assert!(is_expired_at(&payload, 1001));
    }

    #[test]
    fn test_exp_number_forms() {
        assert!(is_expired_at(&claims(r#"{"exp":-5}"#), 0));
        assert!(is_expired_at(&claims(r#"{"exp":1000.5}"#), 1001));
        assert!(!is_expired_at(&claims(r#"{"exp":1000.5}"#), 1000));
    }

    #[test]
    fn test_non_numeric_exp_is_absent() {
        assert!(!is_expired_at(&claims(r#"{"exp":"1000"}"#), 5000));
        assert!(!is_expired_at(&claims(r#"{"exp":null}"#), 5000));
    }

    #[test]
    fn test_expired_relative_to_clock() {
        let now = current_timestamp();
        let past = claims(&format!(r#"{{"exp":{}}}"#, now - 3600));
        let future = claims(&format!(r#"{{"exp":{}}}"#, now + 3600));
        assert!(is_expired(&past));
        assert!(!is_expired(&future));
    }

    #[test]
    fn test_standard_claims() {
        let payload = claims(
            r#"{"iss":"jwt-debugger","sub":"1234567890","aud":"jwt-debugger-app","iat":1516239022,"jti":"abc"}"#,
        );
        assert_eq!(payload.issuer(), Some("jwt-debugger"));
        assert_eq!(payload.subject(), Some("1234567890"));
        assert_eq!(payload.audience(), vec!["jwt-debugger-app"]);
        assert_eq!(payload.issued_at(), Some(1516239022.0));
        assert_eq!(payload.jwt_id(), Some("abc"));
        assert_eq!(payload.not_before(), None);
    }

    #[test]
    fn test_audience_array() {
        let payload = claims(r#"{"aud":["a",1,"b"]}"#);
        assert_eq!(payload.audience(), vec!["a", "b"]);
    }
}
