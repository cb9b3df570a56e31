pub mod panels;
pub mod plot;
pub mod radar;
pub mod table;
