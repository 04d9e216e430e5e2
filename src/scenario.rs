use crate::models::{InputValidationError, ProjectileParameters, check_range, limits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 飛翔時間上限のデフォルト値（秒）
pub const DEFAULT_MAX_FLIGHT_TIME_S: f64 = 600.0;

fn default_max_flight_time() -> f64 {
    DEFAULT_MAX_FLIGHT_TIME_S
}

/// シナリオメタデータ
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// シミュレーション設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// 1射撃あたりの飛翔時間上限（秒）
    #[serde(default = "default_max_flight_time")]
    pub max_flight_time_s: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_flight_time_s: DEFAULT_MAX_FLIGHT_TIME_S,
        }
    }
}

/// 射撃設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShotConfig {
    pub id: String,
    pub initial_speed_mps: f64,
    pub launch_angle_deg: f64,
    pub drag_coefficient: f64,
    pub mass_kg: f64,
    pub caliber_mm: f64,
    /// 目標までの距離（km）。表示にのみ使用
    pub target_distance_km: f64,
}

impl ShotConfig {
    /// 積分器へ渡すパラメータに変換
    pub fn projectile(&self) -> ProjectileParameters {
        ProjectileParameters::new(
            self.initial_speed_mps,
            self.launch_angle_deg,
            self.drag_coefficient,
            self.mass_kg,
            self.caliber_mm,
        )
    }

    /// 目標距離（m）
    pub fn target_distance_m(&self) -> f64 {
        self.target_distance_km * 1000.0
    }

    pub fn validate(&self) -> Result<(), InputValidationError> {
        self.projectile().validate()?;
        check_range("target_distance_km", self.target_distance_km, limits::TARGET_DISTANCE_KM)?;
        Ok(())
    }
}

/// 完全なシナリオ設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub meta: ScenarioMeta,
    #[serde(default)]
    pub sim: SimulationConfig,
    pub shots: Vec<ShotConfig>,
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        let config = Self::from_yaml_str(&contents)
            .map_err(|e| match e {
                ScenarioError::ParseError(_, err) => ScenarioError::ParseError(path.to_path_buf(), err),
                other => other,
            })?;

        Ok(config)
    }

    /// YAML文字列からシナリオ設定を読み込み
    pub fn from_yaml_str(contents: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_yaml::from_str(contents)
            .map_err(|e| ScenarioError::ParseError(std::path::PathBuf::from("<inline>"), e))?;

        config.validate()?;

        Ok(config)
    }

    /// 単発射撃のシナリオを作成（コマンドライン・対話入力用）
    pub fn single_shot(shot: ShotConfig) -> Self {
        Self {
            meta: ScenarioMeta {
                version: "1.0".to_string(),
                name: shot.id.clone(),
                description: String::new(),
            },
            sim: SimulationConfig::default(),
            shots: vec![shot],
        }
    }

    /// 設定の基本的な検証
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let limit = self.sim.max_flight_time_s;
        if !limit.is_finite() || limit <= 0.0 {
            return Err(ScenarioError::ValidationError(
                "max_flight_time_s must be positive".to_string(),
            ));
        }

        if self.shots.is_empty() {
            return Err(ScenarioError::ValidationError("shots must not be empty".to_string()));
        }

        for shot in &self.shots {
            shot.validate().map_err(|e| {
                ScenarioError::ValidationError(format!("Shot {}: {}", shot.id, e))
            })?;
        }

        Ok(())
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== シミュレーション設定 ===");
        println!("飛翔時間上限: {:.1}秒", self.sim.max_flight_time_s);
        println!();

        println!("=== 射撃一覧 ({}件) ===", self.shots.len());
        for shot in &self.shots {
            println!(
                "  {}: 初速 {:.0}m/s, 仰角 {:.1}°, Cd {:.2}, 質量 {:.1}kg, 口径 {:.0}mm, 目標 {:.1}km",
                shot.id,
                shot.initial_speed_mps,
                shot.launch_angle_deg,
                shot.drag_coefficient,
                shot.mass_kg,
                shot.caliber_mm,
                shot.target_distance_km
            );
        }
    }
}

/// シナリオ読み込みエラー
#[derive(Debug)]
pub enum ScenarioError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::FileNotFound(path) => {
                write!(f, "シナリオファイルが見つかりません: {}", path.display())
            }
            ScenarioError::IoError(path, err) => {
                write!(f, "ファイル読み込みエラー {}: {}", path.display(), err)
            }
            ScenarioError::ParseError(path, err) => {
                write!(f, "YAML解析エラー {}: {}", path.display(), err)
            }
            ScenarioError::ValidationError(msg) => {
                write!(f, "設定検証エラー: {}", msg)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}
