pub mod map;
pub mod status;
pub mod tables;
pub mod traceroute;
