pub mod cda;
pub mod explorer;
pub mod export;
pub mod panels;
pub mod plot;
pub mod selector;
pub mod venturi;
