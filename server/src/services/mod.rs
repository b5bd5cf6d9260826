//! Business logic behind the HTTP handlers.

pub mod assets;
pub mod qrcode;
