use super::helpers::{init_error, map_curl_error, parse_server_timing, saturating_sub};
use crate::probe::{ProbeError, ProbeErrorKind};
use curl::easy::{Easy2, Handler, ReadError, WriteError};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

#[derive(Default)]
struct TransferHandler {
    received: u64,
    upload_remaining: u64,
    server_timing: Option<Duration>,
}

impl TransferHandler {
    fn reset(&mut self, upload_bytes: u64) {
        self.received = 0;
        self.upload_remaining = upload_bytes;
        self.server_timing = None;
    }
}

impl Handler for TransferHandler {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        self.received = self.received.saturating_add(data.len() as u64);
        Ok(data.len())
    }

    fn read(&mut self, data: &mut [u8]) -> Result<usize, ReadError> {
        let take = (data.len() as u64).min(self.upload_remaining) as usize;
        data[..take].fill(0);
        self.upload_remaining -= take as u64;
        Ok(take)
    }

    fn header(&mut self, data: &[u8]) -> bool {
        if let Some(timing) = parse_server_timing(data) {
            self.server_timing = Some(timing);
        }
        true
    }
}

/// Timings of one completed transfer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transfer {
    pub bytes: u64,
    /// Request sent to last byte, minus server processing time.
    pub duration: Duration,
    /// Request sent to first byte, minus server processing time.
    pub ttfb: Duration,
}

pub struct TransferClient {
    easy: Easy2<TransferHandler>,
    server: Url,
    timeout: Duration,
    measurement_id: Uuid,
}

impl TransferClient {
    pub fn new(server: Url, timeout: Duration) -> Result<Self, ProbeError> {
        let mut easy = Easy2::new(TransferHandler::default());
        easy.follow_location(true).map_err(|err| init_error(&err))?;
        easy.accept_encoding("").map_err(|err| init_error(&err))?;
        Ok(Self {
            easy,
            server,
            timeout,
            measurement_id: Uuid::new_v4(),
        })
    }

    pub fn latency(&mut self) -> Result<Duration, ProbeError> {
        let url = self.down_url(0)?;
        Ok(self.perform(url, None)?.ttfb)
    }

    pub fn download(&mut self, bytes: u64) -> Result<Transfer, ProbeError> {
        let url = self.down_url(bytes)?;
        self.perform(url, None)
    }

    pub fn upload(&mut self, bytes: u64) -> Result<Transfer, ProbeError> {
        let url = self.endpoint("__up")?;
        self.perform(url, Some(bytes))
    }

    fn down_url(&self, bytes: u64) -> Result<Url, ProbeError> {
        let mut url = self.endpoint("__down")?;
        url.query_pairs_mut()
            .append_pair("bytes", &bytes.to_string());
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProbeError> {
        let mut url = self.server.join(path).map_err(|err| {
            ProbeError::new(ProbeErrorKind::Init, format!("invalid server URL: {err}"))
        })?;
        url.query_pairs_mut()
            .append_pair("measId", &self.measurement_id.to_string());
        Ok(url)
    }

    fn perform(&mut self, url: Url, upload_bytes: Option<u64>) -> Result<Transfer, ProbeError> {
        self.easy.reset();
        self.easy.get_mut().reset(upload_bytes.unwrap_or(0));
        let _ = self.easy.follow_location(true);
        let _ = self.easy.accept_encoding("");
        self.easy
            .url(url.as_str())
            .map_err(|err| map_curl_error(&err))?;
        let _ = self.easy.timeout(self.timeout);

        match upload_bytes {
            Some(bytes) => {
                let _ = self.easy.post(true);
                let _ = self.easy.post_field_size(bytes);
            }
            None => {
                let _ = self.easy.get(true);
            }
        }

        self.easy.perform().map_err(|err| map_curl_error(&err))?;

        let status = self.easy.response_code().unwrap_or(0);
        if status >= 400 {
            return Err(ProbeError::new(
                ProbeErrorKind::HttpStatus,
                format!("HTTP status {status} from {}", url.path()),
            ));
        }

        let t_pretransfer = self.easy.pretransfer_time().unwrap_or_default();
        let t_ttfb = self.easy.starttransfer_time().unwrap_or(t_pretransfer);
        let t_total = self.easy.total_time().unwrap_or(t_ttfb);
        let handler = self.easy.get_ref();
        let server_time = handler.server_timing.unwrap_or_default();

        Ok(Transfer {
            bytes: upload_bytes.unwrap_or(handler.received),
            duration: saturating_sub(saturating_sub(t_total, t_pretransfer), server_time),
            ttfb: saturating_sub(saturating_sub(t_ttfb, t_pretransfer), server_time),
        })
    }
}

#[cfg(test)]
mod tests;
