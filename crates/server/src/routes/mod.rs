pub mod health;
pub mod redirect;
