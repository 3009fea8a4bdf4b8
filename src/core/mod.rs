pub mod mixer;
pub mod session;
