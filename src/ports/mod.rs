pub mod config_port;
pub mod data_port;
pub mod params_port;
pub mod report_port;
