pub mod analyses;
pub mod calculations;
pub mod people;
pub mod statistics;
pub mod timeseries;
