use crate::probe::{ProbeError, ProbeErrorKind};
use curl::Error as CurlError;
use std::time::Duration;

pub(super) fn map_curl_error(err: &CurlError) -> ProbeError {
    let message = err.to_string();

    let kind = if err.is_couldnt_resolve_host() || err.is_couldnt_resolve_proxy() {
        ProbeErrorKind::Dns
    } else if err.is_operation_timedout() {
        ProbeErrorKind::Timeout
    } else if err.is_couldnt_connect() {
        ProbeErrorKind::Connect
    } else if err.is_ssl_connect_error()
        || err.is_ssl_cacert()
        || err.is_ssl_certproblem()
        || err.is_ssl_cipher()
    {
        ProbeErrorKind::Tls
    } else if err.is_http_returned_error() {
        ProbeErrorKind::HttpStatus
    } else {
        ProbeErrorKind::Io
    };

    ProbeError { kind, message }
}

pub(super) fn init_error(err: &CurlError) -> ProbeError {
    ProbeError::new(
        ProbeErrorKind::Init,
        format!("probe client init failed: {err}"),
    )
}

/// Extracts `dur=` (milliseconds) from a `Server-Timing` response header.
pub(super) fn parse_server_timing(header: &[u8]) -> Option<Duration> {
    let line = std::str::from_utf8(header).ok()?.trim();
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("server-timing") {
        return None;
    }
    let (_, rest) = value.split_once("dur=")?;
    let number: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let ms = number.parse::<f64>().ok()?;
    if !ms.is_finite() || ms < 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(ms / 1000.0))
}

pub(super) fn saturating_sub(left: Duration, right: Duration) -> Duration {
    left.checked_sub(right).unwrap_or(Duration::from_millis(0))
}
