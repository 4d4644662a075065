pub mod data_type;
pub mod pollutant;
pub mod site;
