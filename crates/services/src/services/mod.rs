pub mod health;
pub mod qr_code;
pub mod redirect;
