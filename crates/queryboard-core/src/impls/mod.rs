//! Impls - ポートの実装
//!
//! - InMemoryQuestionStore: 開発・テスト用
//! - SqliteQuestionStore: ファイル永続化

pub mod inmem_store;
pub mod sqlite_store;

pub use self::inmem_store::InMemoryQuestionStore;
pub use self::sqlite_store::SqliteQuestionStore;
