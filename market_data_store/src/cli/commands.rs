use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a TOML config file (market_data_store.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Data store root. Overrides the config file and the
    /// MARKET_DATA_ROOT environment variable.
    #[arg(long)]
    pub data_root: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print stored candles for an instrument and date range
    History {
        /// Instrument key (e.g. "NSE_INDEX|Nifty 50")
        #[arg(long)]
        instrument: String,

        /// Candle interval: 1m, 15m, 30m, day, week, month
        #[arg(long, default_value = "day")]
        interval: String,

        /// First IST date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last IST date, inclusive (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,
    },

    /// Print the most recent stored candle for an instrument
    Latest {
        /// Instrument key (e.g. "NSE_INDEX|Nifty 50")
        #[arg(long)]
        instrument: String,

        #[arg(long, default_value = "day")]
        interval: String,
    },

    /// Print a stored option-chain snapshot
    Chain {
        /// Underlying instrument key (e.g. "NSE_INDEX|Nifty 50")
        #[arg(long)]
        underlying: String,

        /// Contract expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: String,

        /// Snapshot date (YYYY-MM-DD); defaults to today in IST
        #[arg(long)]
        date: Option<String>,
    },

    /// Print IV rank and percentile for an underlying
    Iv {
        /// Underlying instrument key (e.g. "NSE_INDEX|Nifty 50")
        #[arg(long)]
        underlying: String,
    },

    /// Report missing candles in a stored range
    Gaps {
        #[arg(long)]
        instrument: String,

        #[arg(long, default_value = "day")]
        interval: String,

        #[arg(long)]
        start: String,

        #[arg(short, long)]
        end: String,
    },

    /// Validate one feather file against its dataset schema
    Validate {
        /// Path to the feather file
        #[arg(long)]
        path: String,

        /// Dataset kind: ohlcv, option_chain, or iv_history
        #[arg(long)]
        kind: String,
    },

    /// Fetch candles from the provider and store them
    Fetch {
        #[arg(long)]
        instrument: String,

        #[arg(long, default_value = "day")]
        interval: String,

        #[arg(long)]
        start: String,

        #[arg(short, long)]
        end: String,

        /// Re-fetch even when the partition file already exists
        #[arg(long)]
        overwrite: bool,
    },

    /// Capture today's option chain and extend the IV history
    Snapshot {
        #[arg(long)]
        underlying: String,

        /// Contract expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: String,
    },
}
