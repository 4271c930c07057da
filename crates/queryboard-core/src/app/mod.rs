//! App - アプリケーション層
//!
//! ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **QuestionService**: list / submit / stats
//! - **CleanupLoop**: 期限切れ・容量超過分の定期削除
//! - **Status**: ヘルスチェック

pub mod builder;
pub mod cleanup_loop;
pub mod service;
pub mod status;

pub use self::builder::{App, AppBuilder, BuildError, DEFAULT_CLEANUP_INTERVAL};
pub use self::cleanup_loop::{CleanupLoop, CleanupReport};
pub use self::service::QuestionService;
pub use self::status::{HealthReport, Status};
