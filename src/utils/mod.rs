pub mod logging;
pub mod table;
