pub mod handlers;
pub mod repository;
pub mod storage;
pub mod validation;
