pub mod candle;
pub mod instrument;
pub mod interval;
pub mod iv;
pub mod option_chain;
