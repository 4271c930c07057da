//! queryboard-core
//!
//! Core building blocks for the question feed: a bounded, expiring
//! collection of submitted questions.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, question, validation, retention, stats, errors）
//! - **ports**: 抽象化レイヤー（QuestionStore, Clock, IdGenerator）
//! - **impls**: ポートの実装（InMemoryQuestionStore, SqliteQuestionStore）
//! - **app**: アプリケーションロジック（builder, service, cleanup_loop, status）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
