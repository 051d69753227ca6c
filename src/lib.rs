pub mod advisor;
pub mod alert;
pub mod anthropic;
pub mod args;
pub mod bh1750;
pub mod dashboard;
pub mod metric;
pub mod mh_z19;
pub mod mock;
pub mod monitor;
pub mod range;
pub mod reading;
pub mod sensor;
pub mod telemetry;

#[cfg(test)]
mod http_stub;
