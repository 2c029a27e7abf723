pub mod audit;
pub mod conversion;
pub mod document;
pub mod gate_pass;
pub mod products;
pub mod profile;
pub mod stock;
