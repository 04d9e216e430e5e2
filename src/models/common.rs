use std::ops::{Add, Mul};

/// 2次元位置（飛翔面内）を表す構造体
///
/// 発射点を原点とし、`x` が水平距離、`y` が高度です。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub x: f64, // m
    pub y: f64, // m (altitude)
}

impl TrajectoryPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 原点（発射点）
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// 地表より下にあるかどうか
    pub fn is_below_ground(&self) -> bool {
        self.y < 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add<Velocity2D> for TrajectoryPoint {
    type Output = Self;

    // Velocity2D * dt を変位として加算する
    fn add(self, displacement: Velocity2D) -> Self::Output {
        Self::new(self.x + displacement.x, self.y + displacement.y)
    }
}

/// 2次元速度を表す構造体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity2D {
    pub x: f64, // m/s
    pub y: f64, // m/s
}

impl Velocity2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 初速と仰角（度）から速度成分を作成
    pub fn from_polar(speed: f64, angle_deg: f64) -> Self {
        let angle = math_utils::deg_to_rad(angle_deg);
        Self::new(speed * angle.cos(), speed * angle.sin())
    }

    /// 速度ベクトルの大きさ
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Mul<f64> for Velocity2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

// Velocity2D + Acceleration2D*dt の演算を可能にする
impl Add<Acceleration2D> for Velocity2D {
    type Output = Self;

    fn add(self, acceleration: Acceleration2D) -> Self::Output {
        Self::new(self.x + acceleration.x, self.y + acceleration.y)
    }
}

/// 2次元加速度を表す構造体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceleration2D {
    pub x: f64, // m/s²
    pub y: f64, // m/s²
}

impl Acceleration2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Mul<f64> for Acceleration2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

/// シミュレーション定数
///
/// 大気密度は海面高度の一定値で、高度補正は行いません。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConstants {
    /// 重力加速度（m/s²）
    pub gravity: f64,
    /// 大気密度（kg/m³）
    pub air_density: f64,
    /// 積分時間刻み（秒）
    pub dt: f64,
}

impl SimulationConstants {
    pub const GRAVITY: f64 = 9.80665;
    pub const AIR_DENSITY: f64 = 1.225;
    pub const DT: f64 = 0.01;
}

impl Default for SimulationConstants {
    fn default() -> Self {
        Self {
            gravity: Self::GRAVITY,
            air_density: Self::AIR_DENSITY,
            dt: Self::DT,
        }
    }
}

/// 数学ユーティリティ関数
pub mod math_utils {
    /// 度をラジアンに変換
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    /// 空気抵抗なしの理論射程（m）
    ///
    /// `v0² · sin(2θ) / g`
    pub fn vacuum_range(speed: f64, angle_deg: f64, gravity: f64) -> f64 {
        speed.powi(2) * (2.0 * deg_to_rad(angle_deg)).sin() / gravity
    }

    /// 口径（mm）から円形断面積（m²）を計算
    pub fn circular_area_from_caliber_mm(caliber_mm: f64) -> f64 {
        let radius_m = caliber_mm / 2000.0;
        std::f64::consts::PI * radius_m.powi(2)
    }
}
