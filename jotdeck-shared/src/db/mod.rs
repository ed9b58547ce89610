/// Database access: connection pooling and migrations

pub mod migrations;
pub mod pool;
