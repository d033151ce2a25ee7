pub mod discovery_use_case;
pub mod ports;
