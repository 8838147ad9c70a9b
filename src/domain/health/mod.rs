pub mod features;
pub mod result;
pub mod risk;
