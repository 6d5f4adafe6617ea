pub mod mgrs;
pub mod utm;
