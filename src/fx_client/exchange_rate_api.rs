use super::{LatestRates, RateProvider};
use crate::config::RateProviderConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

const SUCCESS_RESULT: &str = "success";

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    result: String,
    #[serde(default)]
    base_code: Option<String>,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
}

/// Client for ExchangeRate-API style endpoints (`open.er-api.com/v6/latest/USD`)
pub struct ExchangeRateApiClient {
    client: Client,
    url: String,
}

impl ExchangeRateApiClient {
    pub fn new(config: &RateProviderConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::Unreachable)?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiClient {
    #[instrument(name = "FxRatesFetch", skip(self), fields(url = %self.url))]
    async fn fetch_latest(&self) -> Result<LatestRates, FetchError> {
        info!("Fetching exchange rates from provider");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: ExchangeRateResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        into_latest_rates(body)
    }
}

fn into_latest_rates(body: ExchangeRateResponse) -> Result<LatestRates, FetchError> {
    if body.result != SUCCESS_RESULT {
        let reason = body.error_type.unwrap_or(body.result);
        return Err(FetchError::ProviderFailure(reason));
    }

    // A successful payload without `rates` updates nothing rather than failing
    let raw_rates = body.rates.unwrap_or_else(|| {
        warn!("Provider reported success without a rates table");
        HashMap::new()
    });

    let mut rates = HashMap::with_capacity(raw_rates.len());
    for (currency, value) in raw_rates {
        match Decimal::from_f64(value).filter(|d| *d > Decimal::ZERO) {
            Some(rate) => {
                rates.insert(currency.to_uppercase(), rate);
            }
            None => debug!("Ignoring unusable rate {} for {}", value, currency),
        }
    }

    info!("Successfully fetched {} exchange rates", rates.len());

    Ok(LatestRates {
        base_code: body.base_code.unwrap_or_else(|| "USD".to_string()),
        rates,
    })
}
