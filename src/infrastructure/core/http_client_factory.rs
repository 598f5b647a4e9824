use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("kumo/", env!("CARGO_PKG_VERSION"));

/// Timeout and transport-level retry settings for provider clients.
#[derive(Debug, Clone, Copy)]
pub struct HttpClientSettings {
    pub timeout: Duration,
    /// Retries of transient failures (connect errors, 5xx, 429) inside one
    /// request. Zero disables the middleware.
    pub transient_retries: u32,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            transient_retries: 2,
        }
    }
}

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with retry middleware
    pub fn create_client(settings: HttpClientSettings) -> ClientWithMiddleware {
        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        let mut builder = ClientBuilder::new(client);
        if settings.transient_retries > 0 {
            let retry_policy =
                ExponentialBackoff::builder().build_with_max_retries(settings.transient_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }
        builder.build()
    }
}

/// Joins `path` onto `base_url` and appends percent-encoded query pairs.
/// reqwest-middleware does not expose `.query()`, so the URL is built up front.
pub fn build_url_with_query<K, V>(
    base_url: &str,
    path: &str,
    params: &[(K, V)],
) -> Result<Url, url::ParseError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(path.split('/').filter(|p| !p.is_empty()));
    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (k, v) in params {
            query.append_pair(k.as_ref(), v.as_ref());
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_query() {
        let url = build_url_with_query(
            "https://api.mexc.com",
            "/api/v3/klines",
            &[("symbol", "XPLUSDT"), ("interval", "60m"), ("limit", "1000")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.mexc.com/api/v3/klines?symbol=XPLUSDT&interval=60m&limit=1000"
        );
    }

    #[test]
    fn test_build_url_keeps_base_path_and_escapes_segments() {
        let url = build_url_with_query::<&str, &str>(
            "http://127.0.0.1:9000/proxy/",
            "v8/finance/chart/BTC USD",
            &[],
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/proxy/v8/finance/chart/BTC%20USD");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(build_url_with_query::<&str, &str>("not a url", "/x", &[]).is_err());
    }
}
