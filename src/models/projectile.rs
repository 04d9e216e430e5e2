use crate::models::common::math_utils;

/// 入力値の許容範囲
///
/// パラメータ供給側（シナリオファイル、コマンドライン、対話入力）が
/// 積分前にこの範囲で検証します。積分器自体は再検証しません。
pub mod limits {
    /// 初速（m/s）
    pub const SPEED_MPS: (f64, f64) = (100.0, 2000.0);
    /// 仰角（度）
    pub const ANGLE_DEG: (f64, f64) = (0.0, 90.0);
    /// 抗力係数
    pub const DRAG_COEFFICIENT: (f64, f64) = (0.1, 2.0);
    /// 質量（kg）
    pub const MASS_KG: (f64, f64) = (0.1, 1000.0);
    /// 口径（mm）
    pub const CALIBER_MM: (f64, f64) = (1.0, 500.0);
    /// 目標距離（km）。表示側のみで使用
    pub const TARGET_DISTANCE_KM: (f64, f64) = (0.1, 50.0);
}

/// 入力値検証エラー
#[derive(Debug, Clone, PartialEq)]
pub struct InputValidationError {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl std::fmt::Display for InputValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "入力値が範囲外です: {} = {} (許容範囲: {}〜{})",
            self.field, self.value, self.min, self.max
        )
    }
}

impl std::error::Error for InputValidationError {}

/// 値が範囲 `[min, max]` に収まっているか検証
///
/// NaNは常に範囲外として扱います。
pub fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<f64, InputValidationError> {
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(InputValidationError { field, value, min, max })
    }
}

/// 射撃パラメータ
///
/// 1回の射撃ごとに作成され、積分器に一度だけ渡されます。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileParameters {
    /// 初速（m/s）
    pub initial_speed: f64,
    /// 発射仰角（度）
    pub launch_angle_deg: f64,
    /// 抗力係数（無次元）
    pub drag_coefficient: f64,
    /// 質量（kg）
    pub mass: f64,
    /// 口径（mm）
    pub caliber_mm: f64,
}

impl ProjectileParameters {
    pub fn new(
        initial_speed: f64,
        launch_angle_deg: f64,
        drag_coefficient: f64,
        mass: f64,
        caliber_mm: f64,
    ) -> Self {
        Self {
            initial_speed,
            launch_angle_deg,
            drag_coefficient,
            mass,
            caliber_mm,
        }
    }

    /// 範囲検証付きでパラメータを作成
    pub fn validated(
        initial_speed: f64,
        launch_angle_deg: f64,
        drag_coefficient: f64,
        mass: f64,
        caliber_mm: f64,
    ) -> Result<Self, InputValidationError> {
        let params = Self::new(initial_speed, launch_angle_deg, drag_coefficient, mass, caliber_mm);
        params.validate()?;
        Ok(params)
    }

    /// 全フィールドを許容範囲で検証
    pub fn validate(&self) -> Result<(), InputValidationError> {
        check_range("initial_speed", self.initial_speed, limits::SPEED_MPS)?;
        check_range("launch_angle_deg", self.launch_angle_deg, limits::ANGLE_DEG)?;
        check_range("drag_coefficient", self.drag_coefficient, limits::DRAG_COEFFICIENT)?;
        check_range("mass", self.mass, limits::MASS_KG)?;
        check_range("caliber_mm", self.caliber_mm, limits::CALIBER_MM)?;
        Ok(())
    }

    /// 断面積（m²）: `π·(caliber_mm/2000)²`
    pub fn cross_sectional_area(&self) -> f64 {
        math_utils::circular_area_from_caliber_mm(self.caliber_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_validated_accepts_documented_ranges() {
        assert!(ProjectileParameters::validated(300.0, 45.0, 0.3, 10.0, 120.0).is_ok());
        assert!(ProjectileParameters::validated(100.0, 0.0, 0.1, 0.1, 1.0).is_ok());
        assert!(ProjectileParameters::validated(2000.0, 90.0, 2.0, 1000.0, 500.0).is_ok());
    }

    #[test]
    fn test_validated_rejects_out_of_range() {
        let err = ProjectileParameters::validated(99.0, 45.0, 0.3, 10.0, 120.0).unwrap_err();
        assert_eq!(err.field, "initial_speed");
        assert_eq!(err.min, 100.0);

        let err = ProjectileParameters::validated(300.0, 91.0, 0.3, 10.0, 120.0).unwrap_err();
        assert_eq!(err.field, "launch_angle_deg");

        let err = ProjectileParameters::validated(300.0, 45.0, 0.3, 10.0, f64::NAN).unwrap_err();
        assert_eq!(err.field, "caliber_mm");
    }

    #[test]
    fn test_cross_sectional_area() {
        let params = ProjectileParameters::new(300.0, 45.0, 0.3, 10.0, 120.0);
        assert_relative_eq!(params.cross_sectional_area(), 0.011_309_733_552_923_255, epsilon = 1e-12);
    }
}
