pub mod github_login;
pub mod review;
pub mod session;
