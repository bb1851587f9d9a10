//! Fire behaviour models

pub mod spread_rate;

pub use spread_rate::SpreadRateModel;
