use reqwest::Client;
use crate::config::HttpConfig;
use crate::error::Result;

pub fn create_http_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .tcp_nodelay(true)
        .https_only(config.https_only)
        .pool_idle_timeout(config.pool_idle_timeout())
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .build()?;

    Ok(client)
}
