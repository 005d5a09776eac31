use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;

use crate::models::candle::{Candle, CandleSeries};
use crate::models::instrument::InstrumentKey;
use crate::models::option_chain::{OptionQuote, OptionType};
use crate::providers::upstox_rest::params::{date_segment, interval_segment, validate_request};
use crate::providers::upstox_rest::response::{CandleResponse, ChainResponse, ContractLeg};
use crate::providers::{CandleRequest, DataProvider, ProviderError};

const BASE_URL: &str = "https://api.upstox.com/v2";

/// Upstox v2 REST provider.
///
/// Reads the access token from the `UPSTOX_ACCESS_TOKEN` environment
/// variable. Token acquisition/refresh happens outside this crate.
pub struct UpstoxProvider {
    client: Client,
    base_url: String,
    _access_token: SecretString,
}

impl UpstoxProvider {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(BASE_URL)
    }

    /// Provider against a non-default base URL (sandbox, test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let access_token = SecretString::new(get_env_var("UPSTOX_ACCESS_TOKEN")?.into());

        let mut headers = header::HeaderMap::new();
        let bearer = format!("Bearer {}", access_token.expose_secret());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&bearer)
                .map_err(|e| ProviderError::Internal(e.to_string()))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            _access_token: access_token,
        })
    }

    fn quote_from_leg(
        now: DateTime<Utc>,
        underlying: &str,
        spot: f64,
        expiry: NaiveDate,
        strike: f64,
        option_type: OptionType,
        leg: &ContractLeg,
    ) -> OptionQuote {
        let md = &leg.market_data;
        let greeks = &leg.option_greeks;
        OptionQuote {
            timestamp: now,
            underlying_symbol: underlying.to_string(),
            underlying_spot: spot,
            expiry,
            strike,
            option_type,
            ltp: md.ltp,
            bid_price: md.bid_price,
            bid_qty: md.bid_qty,
            ask_price: md.ask_price,
            ask_qty: md.ask_qty,
            oi: md.oi,
            oi_change: md.oi - md.prev_oi,
            volume: md.volume,
            iv: greeks.iv,
            delta: greeks.delta,
            gamma: greeks.gamma,
            theta: greeks.theta,
            vega: greeks.vega,
        }
    }
}

#[async_trait]
impl DataProvider for UpstoxProvider {
    async fn fetch_candles(&self, params: CandleRequest) -> Result<CandleSeries, ProviderError> {
        validate_request(&params)?;

        // Path layout: /historical-candle/{key}/{interval}/{to}/{from}.
        let url = format!(
            "{}/historical-candle/{}/{}/{}/{}",
            self.base_url,
            params.instrument,
            interval_segment(params.interval),
            date_segment(params.end),
            date_segment(params.start),
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(error_msg));
        }

        let payload = response.json::<CandleResponse>().await?;
        if payload.status != "success" {
            return Err(ProviderError::Api(format!(
                "historical-candle returned status {}",
                payload.status
            )));
        }

        // The API returns newest-first; the canonical series is ascending.
        let mut candles = Vec::with_capacity(payload.data.candles.len());
        for (ts, open, high, low, close, volume, oi) in payload.data.candles {
            let timestamp = DateTime::parse_from_rfc3339(&ts)
                .map_err(|_| ProviderError::Internal(format!("bad candle timestamp `{ts}`")))?
                .with_timezone(&Utc);
            candles.push(Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume: volume as i64,
                open_interest: oi as i64,
            });
        }
        candles.sort_by_key(|c| c.timestamp);

        Ok(CandleSeries {
            instrument: params.instrument,
            interval: params.interval,
            candles,
        })
    }

    async fn fetch_option_chain(
        &self,
        underlying: &InstrumentKey,
        expiry: NaiveDate,
    ) -> Result<Vec<OptionQuote>, ProviderError> {
        let url = format!("{}/option/chain", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("instrument_key", underlying.to_string()),
                ("expiry_date", date_segment(expiry)),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(error_msg));
        }

        let payload = response.json::<ChainResponse>().await?;
        if payload.status != "success" {
            return Err(ProviderError::Api(format!(
                "option/chain returned status {}",
                payload.status
            )));
        }

        let now = Utc::now();
        let underlying_key = underlying.to_string();
        let mut rows = Vec::new();
        for entry in payload.data {
            let entry_expiry = NaiveDate::parse_from_str(&entry.expiry, "%Y-%m-%d")
                .map_err(|_| ProviderError::Internal(format!("bad expiry `{}`", entry.expiry)))?;
            if let Some(call) = &entry.call_options {
                rows.push(Self::quote_from_leg(
                    now,
                    &underlying_key,
                    entry.underlying_spot_price,
                    entry_expiry,
                    entry.strike_price,
                    OptionType::Call,
                    call,
                ));
            }
            if let Some(put) = &entry.put_options {
                rows.push(Self::quote_from_leg(
                    now,
                    &underlying_key,
                    entry.underlying_spot_price,
                    entry_expiry,
                    entry.strike_price,
                    OptionType::Put,
                    put,
                ));
            }
        }
        Ok(rows)
    }
}
