pub mod session;
pub mod symbols;
