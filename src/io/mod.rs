pub mod recovery;
pub mod state;
pub mod storage;
pub mod workspace;
