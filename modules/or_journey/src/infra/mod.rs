pub mod identity;
pub mod storage;
