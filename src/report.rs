//! # Report モジュール
//!
//! 弾道計算結果の表示と出力を行います。
//!
//! - 結果要約（最大高度・射程・計算飛翔時間・目標との差）のコンソール表示
//! - 弾道点列のCSV出力（`t_s,x_m,y_m`）

use crate::models::{SimulationConstants, TrajectoryResult, TrajectorySummary};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// 計算失敗時にユーザーへ表示するメッセージ
pub const COMPUTATION_FAILED_MESSAGE: &str = "弾道を計算できませんでした";

/// 1射撃の表示用レポート
#[derive(Debug, Clone, PartialEq)]
pub struct ShotReport {
    pub shot_id: String,
    pub summary: TrajectorySummary,
    /// 目標距離（m）
    pub target_distance_m: f64,
}

impl ShotReport {
    pub fn new(shot_id: &str, result: &TrajectoryResult, target_distance_m: f64) -> Self {
        Self {
            shot_id: shot_id.to_string(),
            summary: result.summary(),
            target_distance_m,
        }
    }

    /// 着弾点と目標の水平差（m）。正なら目標より遠い
    pub fn target_offset(&self) -> f64 {
        self.summary.range - self.target_distance_m
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "=== 結果: {} ===", self.shot_id)?;
        writeln!(writer, "最大高度: {:.1} m", self.summary.max_altitude)?;
        writeln!(writer, "射程: {:.1} m", self.summary.range)?;
        writeln!(writer, "計算飛翔時間: {:.2} 秒", self.summary.total_flight_time)?;
        writeln!(
            writer,
            "目標との差: {:+.1} m (目標距離 {:.1} m)",
            self.target_offset(),
            self.target_distance_m
        )?;
        Ok(())
    }

    pub fn print(&self) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        // 標準出力への書き込み失敗は無視する
        let _ = self.write_to(&mut handle);
    }
}

/// 弾道点列をCSV形式で書き込む
///
/// i 番目の点の時刻は `(i + 1) · dt`（発射点は含まない）。
pub fn write_trajectory_csv<W: Write>(
    writer: &mut W,
    result: &TrajectoryResult,
    dt: f64,
) -> io::Result<()> {
    writeln!(writer, "t_s,x_m,y_m")?;
    for (i, point) in result.points.iter().enumerate() {
        let t = (i + 1) as f64 * dt;
        writeln!(writer, "{:.2},{:.3},{:.3}", t, point.x, point.y)?;
    }
    Ok(())
}

/// 弾道点列をCSVファイルへ保存
pub fn save_trajectory_csv<P: AsRef<Path>>(path: P, result: &TrajectoryResult) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write_trajectory_csv(&mut writer, result, SimulationConstants::DT)?;
    writer.flush()
}
