pub mod company;
pub mod company_branch;
pub mod qr_code;
