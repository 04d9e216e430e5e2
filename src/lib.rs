//! 重力と二次空気抵抗を考慮した弾道シミュレーション
//!
//! 中核は [`integrator`] の弾道積分器で、それ以外のモジュールは
//! パラメータ供給（シナリオファイル・対話入力）と結果表示を担当します。

pub mod input;
pub mod integrator;
pub mod logging;
pub mod models;
pub mod report;
pub mod scenario;
pub mod simulation;
