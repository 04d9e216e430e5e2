use crate::models::common::TrajectoryPoint;

/// 飛翔状態
///
/// `Flying` から `Landed` への一方向遷移のみ存在します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    /// 飛翔中（y ≥ 0）
    Flying,
    /// 着弾（更新後に y < 0 を観測）
    Landed,
}

/// 弾道計算結果
///
/// 点列は時系列順で、発射点（t = 0）は含みません。
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryResult {
    pub points: Vec<TrajectoryPoint>,
    /// 総飛翔時間（秒）= ステップ数 × dt
    pub total_flight_time: f64,
}

impl TrajectoryResult {
    pub fn new(points: Vec<TrajectoryPoint>, total_flight_time: f64) -> Self {
        Self { points, total_flight_time }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 最終点（着弾点）
    pub fn impact_point(&self) -> Option<TrajectoryPoint> {
        self.points.last().copied()
    }

    /// 最大高度（m）
    pub fn max_altitude(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(0.0, f64::max)
    }

    /// 水平射程（m）。最終点の x
    pub fn range(&self) -> f64 {
        self.impact_point().map(|p| p.x).unwrap_or(0.0)
    }

    pub fn summary(&self) -> TrajectorySummary {
        TrajectorySummary {
            max_altitude: self.max_altitude(),
            range: self.range(),
            total_flight_time: self.total_flight_time,
            point_count: self.points.len(),
        }
    }
}

/// 表示用の弾道要約
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySummary {
    pub max_altitude: f64,
    pub range: f64,
    pub total_flight_time: f64,
    pub point_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_points() {
        let result = TrajectoryResult::new(
            vec![
                TrajectoryPoint::new(1.0, 2.0),
                TrajectoryPoint::new(2.0, 3.5),
                TrajectoryPoint::new(3.0, -0.1),
            ],
            0.03,
        );
        let summary = result.summary();
        assert_eq!(summary.max_altitude, 3.5);
        assert_eq!(summary.range, 3.0);
        assert_eq!(summary.point_count, 3);
    }

    #[test]
    fn test_empty_result() {
        let result = TrajectoryResult::new(Vec::new(), 0.0);
        assert!(result.is_empty());
        assert_eq!(result.max_altitude(), 0.0);
        assert_eq!(result.range(), 0.0);
        assert!(result.impact_point().is_none());
    }
}
