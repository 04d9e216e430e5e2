// 基本的なデータ型と数学ユーティリティ
pub mod common;

// 射撃パラメータと入力範囲
pub mod projectile;

// 弾道計算結果
pub mod trajectory;

// 便利な re-export
pub use common::*;
pub use projectile::{InputValidationError, ProjectileParameters, check_range, limits};
pub use trajectory::{FlightPhase, TrajectoryResult, TrajectorySummary};
