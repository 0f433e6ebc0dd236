use async_trait::async_trait;
use reqwest::Client;
use std::io;
use std::time::Duration;
use tracing::warn;

use super::ReadAt;

/// HTTP Range source for remote feed bundles.
///
/// A HEAD request up front verifies Range support and learns the bundle
/// size; after that each `read_at` is a single Range GET, so listing or
/// pulling a few members out of a large hosted feed never downloads the
/// whole archive.
pub struct HttpRangeReader {
    client: Client,
    url: String,
    size: u64,
    max_retry: u32,
}

impl HttpRangeReader {
    pub async fn new(url: String) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let resp = client.head(&url).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("HTTP request failed with status: {}", resp.status());
        }

        let accept_ranges = resp
            .headers()
            .get("accept-ranges")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none");
        if !accept_ranges.contains("bytes") {
            anyhow::bail!("remote server does not support Range requests");
        }

        let size = resp
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| anyhow::anyhow!("remote server did not return Content-Length"))?;

        Ok(Self {
            client,
            url,
            size,
            max_retry: 10,
        })
    }
}

#[async_trait]
impl ReadAt for HttpRangeReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        if offset + buf.len() as u64 > self.size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "range read past end of remote bundle",
            ));
        }

        let end = offset + buf.len() as u64 - 1;
        let mut received = 0usize;
        let mut retry_count = 0u32;

        while received < buf.len() {
            let range = format!("bytes={}-{}", offset + received as u64, end);
            let result = self
                .client
                .get(&self.url)
                .header("Range", &range)
                .send()
                .await;

            match result {
                Ok(resp) => {
                    if resp.status() != reqwest::StatusCode::PARTIAL_CONTENT {
                        return Err(io::Error::other(format!(
                            "HTTP request failed with status: {}",
                            resp.status()
                        )));
                    }
                    let bytes = resp.bytes().await.map_err(io::Error::other)?;
                    let chunk_len = bytes.len().min(buf.len() - received);
                    if chunk_len == 0 {
                        // A 206 with an empty body makes no progress; count
                        // it against the retry budget instead of looping on
                        // the same Range forever.
                        retry_count += 1;
                        if retry_count >= self.max_retry {
                            return Err(io::Error::other(
                                "server kept returning empty partial responses",
                            ));
                        }
                        warn!(retry = retry_count, max = self.max_retry, "empty partial response, retrying");
                        continue;
                    }
                    buf[received..received + chunk_len].copy_from_slice(&bytes[..chunk_len]);
                    received += chunk_len;
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        return Err(io::Error::other("max retries exceeded"));
                    }
                    warn!(retry = retry_count, max = self.max_retry, error = %e, "connection error, retrying");
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(io::Error::other(e)),
            }
        }

        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }
}
