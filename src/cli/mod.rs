pub mod convert;
pub mod names;
pub mod rates;
pub mod ui;
