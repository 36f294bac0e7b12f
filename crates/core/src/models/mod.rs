pub mod chart;
pub mod date_range;
pub mod period;
pub mod price;
pub mod settings;
pub mod symbol;
