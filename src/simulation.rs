//! # Simulation モジュール
//!
//! シナリオに含まれる射撃を順に実行し、結果を表示側へ渡す実行エンジンを提供します。
//!
//! 各射撃について以下の順序で処理します：
//!
//! 1. **パラメータ変換**: `ShotConfig` から `ProjectileParameters` を作成
//! 2. **弾道計算**: 飛翔時間上限付きで積分器を実行
//! 3. **結果表示**: 要約の表示と、指定があればCSV出力
//! 4. **履歴記録**: 実行結果を `ShotRecord` として保持
//!
//! 弾道計算に失敗した射撃は部分結果を破棄し、表示を行わずに次の射撃へ進みます。
//! 実行履歴はエンジンのインスタンスが保持し、プロセス全体で共有される状態はありません。
//!
//! ## 使用例
//!
//! ```rust,no_run
//! use shotsim::scenario::ScenarioConfig;
//! use shotsim::simulation::SimulationEngine;
//!
//! let config = ScenarioConfig::from_file("scenarios/howitzer.yaml")?;
//! let mut engine = SimulationEngine::new(config, 1);
//! engine.run()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::integrator::{NumericError, integrate_with_limit};
use crate::models::TrajectoryResult;
use crate::report::{self, COMPUTATION_FAILED_MESSAGE, ShotReport};
use crate::scenario::{ScenarioConfig, ShotConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// 射撃の実行結果
#[derive(Debug, Clone)]
pub enum ShotOutcome {
    Completed {
        result: TrajectoryResult,
        report: ShotReport,
    },
    Failed(NumericError),
}

/// 実行履歴の1件
#[derive(Debug, Clone)]
pub struct ShotRecord {
    pub shot: ShotConfig,
    pub outcome: ShotOutcome,
}

impl ShotRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ShotOutcome::Completed { .. })
    }
}

pub struct SimulationEngine {
    pub scenario_config: ScenarioConfig,
    pub verbose_level: u8,
    /// CSV出力先。複数射撃の場合は射撃IDをファイル名に付加
    pub csv_output: Option<PathBuf>,
    /// 結果要約を標準出力に表示するか
    pub print_reports: bool,
    pub history: Vec<ShotRecord>,
}

impl SimulationEngine {
    pub fn new(scenario: ScenarioConfig, verbose_level: u8) -> Self {
        Self {
            scenario_config: scenario,
            verbose_level,
            csv_output: None,
            print_reports: true,
            history: Vec::new(),
        }
    }

    pub fn with_csv_output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.csv_output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_print_reports(mut self, enabled: bool) -> Self {
        self.print_reports = enabled;
        self
    }

    /// 全射撃を実行
    ///
    /// 数値計算エラーは射撃単位で記録し、処理は継続します。
    /// CSV出力の入出力エラーのみ呼び出し元へ返します。
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("=== シミュレーション実行開始: {} ===", self.scenario_config.meta.name);

        let shots = self.scenario_config.shots.clone();
        let multiple = shots.len() > 1;

        for shot in shots {
            let record = self.run_shot(&shot, multiple)?;
            self.history.push(record);
        }

        let succeeded = self.history.iter().filter(|r| r.is_success()).count();
        info!("=== シミュレーション完了 ===");
        info!("成功: {}/{}", succeeded, self.history.len());

        Ok(())
    }

    fn run_shot(&self, shot: &ShotConfig, multiple: bool) -> Result<ShotRecord, Box<dyn std::error::Error>> {
        let params = shot.projectile();
        let limit = self.scenario_config.sim.max_flight_time_s;

        if self.verbose_level > 1 {
            debug!(
                "射撃 {}: 初速 {:.0}m/s, 仰角 {:.1}°, Cd {:.2}, 質量 {:.1}kg, 口径 {:.0}mm",
                shot.id,
                params.initial_speed,
                params.launch_angle_deg,
                params.drag_coefficient,
                params.mass,
                params.caliber_mm
            );
        }

        let outcome = match integrate_with_limit(&params, limit) {
            Ok(result) => {
                let report = ShotReport::new(&shot.id, &result, shot.target_distance_m());

                if self.verbose_level > 0 {
                    info!(
                        "射撃 {} 完了: 射程 {:.1}m, 最大高度 {:.1}m, 飛翔時間 {:.2}秒 ({}点)",
                        shot.id,
                        report.summary.range,
                        report.summary.max_altitude,
                        report.summary.total_flight_time,
                        report.summary.point_count
                    );
                }

                if self.print_reports {
                    report.print();
                }

                if let Some(path) = self.csv_path_for(&shot.id, multiple) {
                    report::save_trajectory_csv(&path, &result)?;
                    info!("弾道CSVを出力しました: {}", path.display());
                }

                ShotOutcome::Completed { result, report }
            }
            Err(e) => {
                error!("射撃 {}: {}: {}", shot.id, COMPUTATION_FAILED_MESSAGE, e);
                if self.print_reports {
                    println!("{} ({})", COMPUTATION_FAILED_MESSAGE, shot.id);
                }
                ShotOutcome::Failed(e)
            }
        };

        Ok(ShotRecord {
            shot: shot.clone(),
            outcome,
        })
    }

    // 複数射撃時は "out.csv" -> "out_S001.csv"
    fn csv_path_for(&self, shot_id: &str, multiple: bool) -> Option<PathBuf> {
        let path = self.csv_output.as_ref()?;
        if !multiple {
            return Some(path.clone());
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("trajectory");
        let file_name = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}_{}.{}", stem, shot_id, ext),
            None => format!("{}_{}", stem, shot_id),
        };
        Some(path.with_file_name(file_name))
    }
}
