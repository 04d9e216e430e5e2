//! # Integrator モジュール
//!
//! 重力と二次空気抵抗を受ける弾丸の弾道を、固定時間刻みの前進オイラー法で
//! 数値積分します。
//!
//! 積分器は純粋な関数として実装されており、入出力・ログ出力・状態保持を
//! 一切行いません。結果の保持や表示は呼び出し側の責務です。
//!
//! ## 1ステップの処理順序
//!
//! 1. 速さ `|v|` を計算（0 の場合は `NumericError::DivisionByZero`）
//! 2. 抗力 `F = ½·Cd·ρ·A·|v|²` と抗力加速度 `F/m` を計算
//! 3. 加速度 `ax = -a_d·vx/|v|`, `ay = -g - a_d·vy/|v|`
//! 4. 速度を更新し、更新後の速度で位置を更新
//! 5. 時刻を `dt` 進める
//!
//! 更新後に `y < 0` となった時点で着弾とし、その点を記録してから停止します。
//!
//! ## 使用例
//!
//! ```rust
//! use shotsim::integrator::integrate;
//! use shotsim::models::ProjectileParameters;
//!
//! let params = ProjectileParameters::new(300.0, 45.0, 0.3, 10.0, 120.0);
//! let result = integrate(&params).expect("弾道計算に失敗");
//! println!("射程: {:.1}m", result.range());
//! ```

use crate::models::{
    Acceleration2D, FlightPhase, ProjectileParameters, SimulationConstants, TrajectoryPoint,
    TrajectoryResult, Velocity2D,
};

/// 数値計算エラー
#[derive(Debug, Clone, PartialEq)]
pub enum NumericError {
    /// 速さが0となり、速度方向の単位ベクトルが定義できない
    DivisionByZero,
    /// 位置または速度が有限値でなくなった（オーバーフロー等）
    NonFinite { step: u64, time: f64 },
    /// 呼び出し側が指定した飛翔時間上限を超過した
    FlightTimeExceeded { limit: f64 },
}

impl std::fmt::Display for NumericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericError::DivisionByZero => {
                write!(f, "ゼロ除算: 速度の大きさが0になりました")
            }
            NumericError::NonFinite { step, time } => {
                write!(f, "数値が発散しました (ステップ: {}, 時刻: {:.2}秒)", step, time)
            }
            NumericError::FlightTimeExceeded { limit } => {
                write!(f, "飛翔時間が上限 {:.1}秒 を超えました", limit)
            }
        }
    }
}

impl std::error::Error for NumericError {}

/// 積分中の弾丸状態
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub position: TrajectoryPoint,
    pub velocity: Velocity2D,
    /// 経過時間（秒）
    pub time: f64,
    /// 実行済みステップ数
    pub step_count: u64,
    pub phase: FlightPhase,
}

impl FlightState {
    /// 発射直後（t = 0）の状態
    pub fn launch(params: &ProjectileParameters) -> Self {
        Self {
            position: TrajectoryPoint::origin(),
            velocity: Velocity2D::from_polar(params.initial_speed, params.launch_angle_deg),
            time: 0.0,
            step_count: 0,
            phase: FlightPhase::Flying,
        }
    }
}

/// 前進オイラー法による弾道積分器
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    params: ProjectileParameters,
    constants: SimulationConstants,
    /// 断面積（m²）
    area: f64,
}

impl Integrator {
    pub fn new(params: ProjectileParameters) -> Self {
        Self::with_constants(params, SimulationConstants::default())
    }

    pub fn with_constants(params: ProjectileParameters, constants: SimulationConstants) -> Self {
        Self {
            params,
            constants,
            area: params.cross_sectional_area(),
        }
    }

    pub fn constants(&self) -> &SimulationConstants {
        &self.constants
    }

    /// 現在の速度に対する加速度を計算
    fn acceleration(&self, velocity: Velocity2D) -> Result<Acceleration2D, NumericError> {
        let speed = velocity.magnitude();
        if speed == 0.0 {
            return Err(NumericError::DivisionByZero);
        }

        let drag_force = 0.5
            * self.params.drag_coefficient
            * self.constants.air_density
            * self.area
            * speed.powi(2);
        let drag_accel = drag_force / self.params.mass;

        Ok(Acceleration2D::new(
            -drag_accel * (velocity.x / speed),
            -self.constants.gravity - drag_accel * (velocity.y / speed),
        ))
    }

    /// 1ステップ進めた状態を返す
    pub fn step(&self, state: &FlightState) -> Result<FlightState, NumericError> {
        let dt = self.constants.dt;
        let acceleration = self.acceleration(state.velocity)?;

        let velocity = state.velocity + acceleration * dt;
        let position = state.position + velocity * dt;
        let time = state.time + dt;
        let step_count = state.step_count + 1;

        if !position.is_finite() || !velocity.is_finite() {
            return Err(NumericError::NonFinite { step: step_count, time });
        }

        let phase = if position.is_below_ground() {
            FlightPhase::Landed
        } else {
            FlightPhase::Flying
        };

        Ok(FlightState {
            position,
            velocity,
            time,
            step_count,
            phase,
        })
    }

    /// 着弾まで積分する
    ///
    /// `max_flight_time` を指定した場合、経過時間がそれを超えると
    /// `NumericError::FlightTimeExceeded` で打ち切ります。
    pub fn run(&self, max_flight_time: Option<f64>) -> Result<TrajectoryResult, NumericError> {
        let mut state = FlightState::launch(&self.params);
        let mut points = Vec::with_capacity(self.estimated_steps());

        while state.phase == FlightPhase::Flying {
            state = self.step(&state)?;
            points.push(state.position);

            if let Some(limit) = max_flight_time {
                if state.phase == FlightPhase::Flying && state.time > limit {
                    return Err(NumericError::FlightTimeExceeded { limit });
                }
            }
        }

        Ok(TrajectoryResult::new(points, state.time))
    }

    // 真空中の飛翔時間から点数を見積もる（抗力ありでは常にこれ以下）
    fn estimated_steps(&self) -> usize {
        let vy = Velocity2D::from_polar(self.params.initial_speed, self.params.launch_angle_deg).y;
        let t = 2.0 * vy.max(0.0) / self.constants.gravity;
        (t / self.constants.dt).ceil() as usize + 2
    }
}

/// 弾道を計算する
///
/// 点列は最初の積分ステップ後の位置から始まり、地表を下回った最初の点で終わります。
pub fn integrate(params: &ProjectileParameters) -> Result<TrajectoryResult, NumericError> {
    Integrator::new(*params).run(None)
}

/// 飛翔時間上限付きで弾道を計算する
pub fn integrate_with_limit(
    params: &ProjectileParameters,
    max_flight_time: f64,
) -> Result<TrajectoryResult, NumericError> {
    Integrator::new(*params).run(Some(max_flight_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::math_utils;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn reference_shot() -> ProjectileParameters {
        ProjectileParameters::new(300.0, 45.0, 0.3, 10.0, 120.0)
    }

    #[test]
    fn test_reference_scenario() {
        let result = integrate(&reference_shot()).unwrap();

        assert!(!result.is_empty());
        assert!(result.total_flight_time.is_finite());
        assert!(result.total_flight_time > 10.0 && result.total_flight_time < 100.0);

        let vacuum = math_utils::vacuum_range(300.0, 45.0, SimulationConstants::GRAVITY);
        assert_relative_eq!(vacuum, 9177.4, epsilon = 1.0);
        assert!(result.range() > 0.0);
        assert!(result.range() < 0.9 * vacuum);
    }

    #[test]
    fn test_altitude_single_peak() {
        let result = integrate(&reference_shot()).unwrap();
        let ys: Vec<f64> = result.points.iter().map(|p| p.y).collect();
        let peak = ys
            .iter()
            .enumerate()
            .fold(0, |best, (i, &y)| if y > ys[best] { i } else { best });

        assert!(peak > 0 && peak < ys.len() - 1);
        assert!(ys[..=peak].windows(2).all(|w| w[1] > w[0]));
        assert!(ys[peak..].windows(2).all(|w| w[1] < w[0]));
        assert!(*ys.last().unwrap() < 0.0);
    }

    #[test]
    fn test_flight_time_matches_point_count() {
        let result = integrate(&reference_shot()).unwrap();
        let expected = SimulationConstants::DT * result.len() as f64;
        assert_relative_eq!(result.total_flight_time, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_ground_termination() {
        let result = integrate(&reference_shot()).unwrap();
        let n = result.len();
        assert!(result.points[n - 1].y < 0.0);
        assert!(result.points[..n - 1].iter().all(|p| p.y >= 0.0));
    }

    #[test]
    fn test_horizontal_shot_lands_after_one_step() {
        let params = ProjectileParameters::new(500.0, 0.0, 0.3, 10.0, 120.0);
        let result = integrate(&params).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.points[0].y < 0.0);
        assert!(result.points[0].x > 0.0);
        assert_relative_eq!(result.total_flight_time, 0.01);
    }

    #[test]
    fn test_low_drag_approaches_vacuum_range() {
        // 重い弾 + 最小抗力係数 + 小口径で抗力をほぼ無視できる条件
        let params = ProjectileParameters::new(300.0, 45.0, 0.1, 1000.0, 1.0);
        let result = integrate(&params).unwrap();
        let vacuum = math_utils::vacuum_range(300.0, 45.0, SimulationConstants::GRAVITY);

        // dt = 0.01 の離散化誤差は 1 ステップ分の水平移動量程度
        let step_dx = 300.0 * 45f64.to_radians().cos() * SimulationConstants::DT;
        assert!((result.range() - vacuum).abs() < 2.0 * step_dx);
    }

    #[test]
    fn test_range_peaks_near_45_degrees_for_small_drag() {
        let range_at = |angle: f64| {
            integrate(&ProjectileParameters::new(300.0, angle, 0.1, 100.0, 10.0))
                .unwrap()
                .range()
        };

        let rising: Vec<f64> = [5.0, 15.0, 25.0, 35.0, 43.0].iter().map(|&a| range_at(a)).collect();
        let falling: Vec<f64> = [47.0, 55.0, 65.0, 75.0, 85.0].iter().map(|&a| range_at(a)).collect();

        assert!(rising.windows(2).all(|w| w[1] > w[0]));
        assert!(falling.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_zero_velocity_step_is_division_by_zero() {
        let integrator = Integrator::new(reference_shot());
        let state = FlightState {
            position: TrajectoryPoint::new(100.0, 50.0),
            velocity: Velocity2D::new(0.0, 0.0),
            time: 1.0,
            step_count: 100,
            phase: FlightPhase::Flying,
        };
        assert_eq!(integrator.step(&state), Err(NumericError::DivisionByZero));
    }

    #[test]
    fn test_zero_initial_speed_fails_without_points() {
        let params = ProjectileParameters::new(0.0, 45.0, 0.3, 10.0, 120.0);
        assert_eq!(integrate(&params), Err(NumericError::DivisionByZero));
    }

    #[test]
    fn test_non_finite_state_is_reported() {
        let integrator = Integrator::new(reference_shot());
        let state = FlightState {
            position: TrajectoryPoint::new(0.0, 0.0),
            velocity: Velocity2D::new(f64::MAX, f64::MAX),
            time: 0.0,
            step_count: 0,
            phase: FlightPhase::Flying,
        };
        match integrator.step(&state) {
            Err(NumericError::NonFinite { step, .. }) => assert_eq!(step, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_flight_time_limit() {
        let err = integrate_with_limit(&reference_shot(), 1.0).unwrap_err();
        assert_eq!(err, NumericError::FlightTimeExceeded { limit: 1.0 });

        let limited = integrate_with_limit(&reference_shot(), 600.0).unwrap();
        assert_eq!(limited, integrate(&reference_shot()).unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        // k·|v|·dt < 1 となる範囲（前進オイラー法が安定する領域）
        #[test]
        fn prop_deterministic_and_terminates(
            speed in 100.0f64..1000.0,
            angle in 0.0f64..90.0,
            cd in 0.1f64..1.0,
            mass in 5.0f64..1000.0,
            caliber in 1.0f64..200.0,
        ) {
            let params = ProjectileParameters::new(speed, angle, cd, mass, caliber);
            let first = integrate(&params).unwrap();
            let second = integrate(&params).unwrap();

            prop_assert_eq!(&first, &second);
            prop_assert!(!first.is_empty());
            prop_assert!(first.points.last().unwrap().y < 0.0);
            prop_assert!(first.points[..first.len() - 1].iter().all(|p| p.y >= 0.0));
            prop_assert!(first.total_flight_time > 0.0);
        }
    }
}
