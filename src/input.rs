//! # Input モジュール
//!
//! 対話形式で射撃パラメータを入力します。
//!
//! 各値は範囲を満たすまで繰り返し入力を求めます。数値として解釈できない入力や
//! 範囲外の値には案内メッセージを表示して再入力させます。
//! 入力元・出力先はジェネリックにしているため、標準入出力以外でも使用できます。

use crate::models::limits;
use crate::scenario::ShotConfig;
use std::io::{self, BufRead, Write};

/// 範囲検証付きで数値を1つ入力
///
/// 入力が終端（EOF）に達した場合は `UnexpectedEof` エラーを返します。
pub fn prompt_with_validation<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
    (min, max): (f64, f64),
) -> io::Result<f64> {
    loop {
        write!(writer, "{}", prompt)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "入力が終了しました"));
        }

        let value = match line.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                writeln!(writer, "正しい数値を入力してください")?;
                continue;
            }
        };

        if value < min {
            writeln!(writer, "値は {} 以上である必要があります", min)?;
            continue;
        }
        if value > max {
            writeln!(writer, "値は {} 以下である必要があります", max)?;
            continue;
        }

        return Ok(value);
    }
}

/// 射撃パラメータ一式を対話入力
pub fn prompt_shot<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<ShotConfig> {
    writeln!(writer, "射撃パラメータを入力してください:")?;

    let initial_speed_mps =
        prompt_with_validation(reader, writer, "初速 (m/s, 100-2000): ", limits::SPEED_MPS)?;
    let launch_angle_deg =
        prompt_with_validation(reader, writer, "仰角 (度, 0-90): ", limits::ANGLE_DEG)?;
    let drag_coefficient = prompt_with_validation(
        reader,
        writer,
        "抗力係数 (0.1-2.0): ",
        limits::DRAG_COEFFICIENT,
    )?;
    let mass_kg = prompt_with_validation(reader, writer, "質量 (kg, 0.1-1000): ", limits::MASS_KG)?;
    let caliber_mm =
        prompt_with_validation(reader, writer, "口径 (mm, 1-500): ", limits::CALIBER_MM)?;
    let target_distance_km = prompt_with_validation(
        reader,
        writer,
        "目標距離 (km, 0.1-50): ",
        limits::TARGET_DISTANCE_KM,
    )?;

    Ok(ShotConfig {
        id: "interactive".to_string(),
        initial_speed_mps,
        launch_angle_deg,
        drag_coefficient,
        mass_kg,
        caliber_mm,
        target_distance_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_retries_until_valid() {
        let mut reader = Cursor::new("abc\n50\n3000\n250\n");
        let mut output = Vec::new();

        let value = prompt_with_validation(&mut reader, &mut output, "> ", limits::SPEED_MPS).unwrap();
        assert_eq!(value, 250.0);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("正しい数値を入力してください"));
        assert!(text.contains("100 以上"));
        assert!(text.contains("2000 以下"));
    }

    #[test]
    fn test_eof_is_error() {
        let mut reader = Cursor::new("");
        let mut output = Vec::new();
        let err = prompt_with_validation(&mut reader, &mut output, "> ", limits::ANGLE_DEG).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_prompt_shot_reads_all_fields_in_order() {
        let mut reader = Cursor::new("300\n45\n0.3\n10\n120\n5\n");
        let mut output = Vec::new();
        let shot = prompt_shot(&mut reader, &mut output).unwrap();

        assert_eq!(shot.initial_speed_mps, 300.0);
        assert_eq!(shot.launch_angle_deg, 45.0);
        assert_eq!(shot.drag_coefficient, 0.3);
        assert_eq!(shot.mass_kg, 10.0);
        assert_eq!(shot.caliber_mm, 120.0);
        assert_eq!(shot.target_distance_km, 5.0);
        assert!(shot.validate().is_ok());
    }
}
