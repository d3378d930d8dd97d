use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const TTL_MINUTES: i64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionTokenError {
    #[error("malformed selection token")]
    Malformed,
    #[error("selection token signature does not match")]
    BadSignature,
    #[error("selection token has expired")]
    Expired,
}

/// Issue a selection token for a host-id hand-off (spec §6):
/// base64url of `"<host_id>:<unix_expiry>:<hex hmac_sha256>"`.
pub fn issue_selection_token(host_id: &str, key: &[u8], now: DateTime<Utc>) -> String {
    let expiry = (now + Duration::minutes(TTL_MINUTES)).timestamp();
    let payload = format!("{host_id}:{expiry}");
    let signature = sign(key, &payload);
    let raw = format!("{payload}:{signature}");
    URL_SAFE_NO_PAD.encode(raw)
}

/// Verify a selection token: HMAC must match and the token must not
/// have expired (spec §8, invariant 9).
pub fn verify_selection_token(
    token: &str,
    key: &[u8],
    now: DateTime<Utc>,
) -> Result<String, SelectionTokenError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| SelectionTokenError::Malformed)?;
    let raw = String::from_utf8(decoded).map_err(|_| SelectionTokenError::Malformed)?;

    let mut parts = raw.splitn(3, ':');
    let host_id = parts.next().ok_or(SelectionTokenError::Malformed)?;
    let expiry_str = parts.next().ok_or(SelectionTokenError::Malformed)?;
    let signature = parts.next().ok_or(SelectionTokenError::Malformed)?;
    if parts.next().is_some() {
        return Err(SelectionTokenError::Malformed);
    }

    let expiry: i64 = expiry_str.parse().map_err(|_| SelectionTokenError::Malformed)?;

    let payload = format!("{host_id}:{expiry_str}");
    let expected = sign(key, &payload);
    if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        return Err(SelectionTokenError::BadSignature);
    }

    if now.timestamp() > expiry {
        return Err(SelectionTokenError::Expired);
    }

    Ok(host_id.to_string())
}

fn sign(key: &[u8], payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts a key of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KEY: &[u8] = b"test-selection-token-signing-key";

    #[test]
    fn round_trips() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let token = issue_selection_token("host-123", KEY, now);
        let host_id = verify_selection_token(&token, KEY, now).unwrap();
        assert_eq!(host_id, "host-123");
    }

    #[test]
    fn rejects_after_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let token = issue_selection_token("host-123", KEY, now);
        let later = now + Duration::minutes(6);
        assert_eq!(
            verify_selection_token(&token, KEY, later),
            Err(SelectionTokenError::Expired)
        );
    }

    #[test]
    fn rejects_tampered_host_id() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let token = issue_selection_token("host-123", KEY, now);
        let decoded = URL_SAFE_NO_PAD.decode(&token).unwrap();
        let raw = String::from_utf8(decoded).unwrap();
        let mut parts: Vec<&str> = raw.splitn(3, ':').collect();
        parts[0] = "host-999";
        let tampered = URL_SAFE_NO_PAD.encode(parts.join(":"));
        assert_eq!(
            verify_selection_token(&tampered, KEY, now),
            Err(SelectionTokenError::BadSignature)
        );
    }

    #[test]
    fn rejects_tampered_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let token = issue_selection_token("host-123", KEY, now);
        let decoded = URL_SAFE_NO_PAD.decode(&token).unwrap();
        let raw = String::from_utf8(decoded).unwrap();
        let mut parts: Vec<&str> = raw.splitn(3, ':').collect();
        parts[1] = "9999999999";
        let tampered = URL_SAFE_NO_PAD.encode(parts.join(":"));
        assert_eq!(
            verify_selection_token(&tampered, KEY, now),
            Err(SelectionTokenError::BadSignature)
        );
    }

    #[test]
    fn rejects_garbage_input() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(
            verify_selection_token("not-base64-url!!", KEY, now),
            Err(SelectionTokenError::Malformed)
        );
    }
}
