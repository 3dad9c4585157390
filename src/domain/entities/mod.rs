pub mod credential_kind;
pub mod repository;
