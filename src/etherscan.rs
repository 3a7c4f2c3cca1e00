use std::time::Duration;

use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use url::Url;

use crate::models::{AccountTx, EtherscanResponse, TxKind};
use crate::recon;

/// Etherscan caps every transaction-list response at this many records; a
/// shorter page means there is nothing left to fetch.
pub const PAGE_SIZE: usize = 10_000;

/// Client for the Etherscan-style `module=account` REST API.
///
/// The base URL and API key are explicit constructor arguments; there is no
/// process-wide configuration behind it. Requests run strictly one after the
/// other.
#[derive(Clone)]
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build reqwest client")?;
        let base_url = Url::parse(base_url).context("invalid Etherscan API URL")?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Current Ether balance of `address`, or `None` when the provider
    /// declines the request with a non-success envelope status.
    pub async fn eth_balance(&self, address: &str) -> Result<Option<f64>> {
        let resp = self
            .get(&[
                ("module", "account"),
                ("action", "balance"),
                ("address", address),
                ("tag", "latest"),
            ])
            .await
            .context("balance request failed")?;

        if !resp.is_ok() {
            tracing::warn!(
                "provider declined balance lookup for {}: {}",
                address,
                resp.message
            );
            return Ok(None);
        }

        let wei: BigDecimal = resp
            .result
            .as_str()
            .context("balance result is not a string")?
            .parse()
            .context("balance result is not a decimal Wei amount")?;
        Ok(Some(recon::wei_to_ether(&wei)))
    }

    /// Complete ascending-time list of `kind` transactions for `address`,
    /// following pagination until the provider runs out of records.
    ///
    /// A non-success envelope status means "no further results" and ends the
    /// loop without error, even on the first page. Transport and HTTP errors
    /// are fatal.
    pub async fn transactions(
        &self,
        kind: TxKind,
        address: &str,
        startblock: u64,
        endblock: u64,
    ) -> Result<Vec<AccountTx>> {
        let startblock = startblock.to_string();
        let endblock = endblock.to_string();

        let mut all = Vec::new();
        let mut page: u32 = 1;

        loop {
            let page_s = page.to_string();
            let resp = self
                .get(&[
                    ("module", "account"),
                    ("action", kind.action()),
                    ("address", address),
                    ("startblock", &startblock),
                    ("endblock", &endblock),
                    ("sort", "asc"),
                    ("page", &page_s),
                ])
                .await
                .with_context(|| format!("{} transaction request failed (page {})", kind, page))?;

            if !resp.is_ok() {
                tracing::debug!(
                    "provider ended {} pagination for {} at page {}: {}",
                    kind,
                    address,
                    page,
                    resp.message
                );
                break;
            }

            let batch: Vec<AccountTx> = serde_json::from_value(resp.result)
                .with_context(|| format!("unexpected {} result shape (page {})", kind, page))?;
            let fetched = batch.len();
            all.extend(batch);
            tracing::debug!("fetched {} {} transactions on page {}", fetched, kind, page);

            if fetched < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        tracing::info!("{} transactions for {}: {}", kind, address, all.len());
        Ok(all)
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<EtherscanResponse> {
        let resp = self
            .http
            .get(self.base_url.clone())
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .context("request failed")?
            .error_for_status()
            .context("provider returned an HTTP error")?;
        resp.json().await.context("invalid JSON response")
    }
}
