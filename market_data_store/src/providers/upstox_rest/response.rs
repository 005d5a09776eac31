use serde::Deserialize;

/// Envelope of the historical-candle endpoint.
///
/// Candle rows arrive as positional arrays:
/// `[timestamp, open, high, low, close, volume, open_interest]`.
#[derive(Deserialize, Debug)]
pub struct CandleResponse {
    pub status: String,
    pub data: CandleData,
}

#[derive(Deserialize, Debug)]
pub struct CandleData {
    pub candles: Vec<RawCandle>,
}

pub type RawCandle = (String, f64, f64, f64, f64, f64, f64);

/// Envelope of the option-chain endpoint.
#[derive(Deserialize, Debug)]
pub struct ChainResponse {
    pub status: String,
    pub data: Vec<StrikeEntry>,
}

/// One strike row of the chain: spot context plus optional call/put legs.
#[derive(Deserialize, Debug)]
pub struct StrikeEntry {
    pub expiry: String,
    pub strike_price: f64,
    pub underlying_key: String,
    pub underlying_spot_price: f64,
    pub call_options: Option<ContractLeg>,
    pub put_options: Option<ContractLeg>,
}

#[derive(Deserialize, Debug)]
pub struct ContractLeg {
    #[serde(default)]
    pub market_data: MarketData,
    #[serde(default)]
    pub option_greeks: OptionGreeks,
}

#[derive(Deserialize, Debug, Default)]
pub struct MarketData {
    #[serde(default)]
    pub ltp: f64,
    #[serde(default)]
    pub bid_price: f64,
    #[serde(default)]
    pub bid_qty: i64,
    #[serde(default)]
    pub ask_price: f64,
    #[serde(default)]
    pub ask_qty: i64,
    #[serde(default)]
    pub oi: i64,
    #[serde(default)]
    pub prev_oi: i64,
    #[serde(default)]
    pub volume: i64,
}

#[derive(Deserialize, Debug, Default)]
pub struct OptionGreeks {
    #[serde(default)]
    pub iv: f64,
    #[serde(default)]
    pub delta: f64,
    #[serde(default)]
    pub gamma: f64,
    #[serde(default)]
    pub theta: f64,
    #[serde(default)]
    pub vega: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_candle_payload() {
        let body = r#"{
            "status": "success",
            "data": {
                "candles": [
                    ["2025-01-06T09:15:00+05:30", 23510.0, 23555.5, 23498.0, 23540.25, 125000.0, 0.0]
                ]
            }
        }"#;
        let resp: CandleResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.status, "success");
        assert_eq!(resp.data.candles.len(), 1);
        assert_eq!(resp.data.candles[0].4, 23540.25);
    }

    #[test]
    fn parses_chain_payload_with_missing_leg() {
        let body = r#"{
            "status": "success",
            "data": [{
                "expiry": "2025-01-09",
                "strike_price": 23500.0,
                "underlying_key": "NSE_INDEX|Nifty 50",
                "underlying_spot_price": 23512.4,
                "call_options": {
                    "market_data": {"ltp": 145.3, "oi": 1250000, "prev_oi": 1285000, "volume": 5400000},
                    "option_greeks": {"iv": 13.4, "delta": 0.52}
                },
                "put_options": null
            }]
        }"#;
        let resp: ChainResponse = serde_json::from_str(body).unwrap();
        let entry = &resp.data[0];
        assert!(entry.put_options.is_none());
        let call = entry.call_options.as_ref().unwrap();
        assert_eq!(call.market_data.oi, 1_250_000);
        assert_eq!(call.option_greeks.delta, 0.52);
        // Unlisted greeks default to zero.
        assert_eq!(call.option_greeks.vega, 0.0);
    }
}
