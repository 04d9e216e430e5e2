use clap::{Arg, ArgMatches, Command, value_parser};
use shotsim::input::prompt_shot;
use shotsim::logging::{LogConfig, LogOutput, init_logging, level_for_verbosity, parse_log_level};
use shotsim::scenario::{ScenarioConfig, ShotConfig};
use shotsim::simulation::SimulationEngine;
use std::str::FromStr;
use tracing::{debug, info};

const PARAMETER_ARGS: [&str; 5] = ["velocity", "angle", "drag", "mass", "caliber"];

fn main() {
    let matches = build_cli().get_matches();

    let verbose_level = matches.get_count("verbose");
    if let Err(e) = setup_logging(&matches, verbose_level) {
        eprintln!("ログ初期化エラー: {}", e);
        std::process::exit(1);
    }

    match run(&matches, verbose_level) {
        Ok(true) => {}
        Ok(false) => show_default_help(),
        Err(e) => {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_cli() -> Command {
    let parameter = |name: &'static str, long_help: &'static str| {
        Arg::new(name)
            .long(name)
            .value_name("VALUE")
            .value_parser(value_parser!(f64))
            .help(long_help)
            .conflicts_with_all(["scenario", "interactive"])
    };

    Command::new("shotsim")
        .version("0.1.0")
        .about("弾道シミュレーション (Projectile Trajectory Simulation)")
        .long_about("重力と二次空気抵抗を考慮した弾道シミュレーション\n\
                     前進オイラー法 (Δt = 0.01秒) で着弾までの弾道を計算します。")
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("射撃シナリオファイル(.yaml)のパスを指定")
                .conflicts_with("interactive"),
        )
        .arg(parameter("velocity", "初速 (m/s, 100-2000)"))
        .arg(parameter("angle", "仰角 (度, 0-90)"))
        .arg(parameter("drag", "抗力係数 (0.1-2.0)"))
        .arg(parameter("mass", "質量 (kg, 0.1-1000)"))
        .arg(parameter("caliber", "口径 (mm, 1-500)"))
        .arg(
            Arg::new("distance")
                .long("distance")
                .value_name("KM")
                .value_parser(value_parser!(f64))
                .default_value("1.0")
                .help("目標距離 (km, 0.1-50)"),
        )
        .arg(
            Arg::new("interactive")
                .long("interactive")
                .action(clap::ArgAction::SetTrue)
                .help("射撃パラメータを対話形式で入力"),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("CSV")
                .help("弾道点列をCSVファイルに出力"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: 基本, -vv: 詳細, -vvv: デバッグ)"),
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("TARGET")
                .value_parser(["console", "file", "both"])
                .default_value("console")
                .help("ログ出力先"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error)。指定時は -v より優先"),
        )
}

fn setup_logging(matches: &ArgMatches, verbose_level: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match matches.get_one::<String>("log-level") {
        Some(level) => parse_log_level(level),
        None => level_for_verbosity(verbose_level),
    };
    let output = matches
        .get_one::<String>("log-output")
        .map(|s| LogOutput::from_str(s))
        .transpose()?
        .unwrap_or(LogOutput::Console);

    init_logging(LogConfig {
        level,
        output,
        ..LogConfig::default()
    })
}

/// 射撃を実行する。実行対象が指定されていなければ `Ok(false)`
fn run(matches: &ArgMatches, verbose_level: u8) -> Result<bool, Box<dyn std::error::Error>> {
    let scenario = match load_scenario(matches)? {
        Some(scenario) => scenario,
        None => return Ok(false),
    };

    if matches.get_flag("info") {
        scenario.print_summary();
        return Ok(true);
    }

    if verbose_level > 0 {
        scenario.print_summary();
        println!();
    }

    let mut engine = SimulationEngine::new(scenario, verbose_level);
    if let Some(path) = matches.get_one::<String>("output") {
        engine = engine.with_csv_output(path);
    }
    engine.run()?;

    Ok(true)
}

fn load_scenario(matches: &ArgMatches) -> Result<Option<ScenarioConfig>, Box<dyn std::error::Error>> {
    if let Some(path) = matches.get_one::<String>("scenario") {
        let scenario = ScenarioConfig::from_file(path)?;
        info!("シナリオファイル読み込み完了: {}", path);
        return Ok(Some(scenario));
    }

    let distance = matches.get_one::<f64>("distance").copied().unwrap_or(1.0);

    if matches.get_flag("interactive") {
        let stdin = std::io::stdin();
        let mut reader = stdin.lock();
        let mut writer = std::io::stdout();
        let shot = prompt_shot(&mut reader, &mut writer)?;
        debug!("対話入力完了: {:?}", shot);
        return Ok(Some(ScenarioConfig::single_shot(shot)));
    }

    let values: Vec<Option<f64>> = PARAMETER_ARGS
        .iter()
        .map(|name| matches.get_one::<f64>(name).copied())
        .collect();

    match values.as_slice() {
        [Some(velocity), Some(angle), Some(drag), Some(mass), Some(caliber)] => {
            let shot = ShotConfig {
                id: "cli".to_string(),
                initial_speed_mps: *velocity,
                launch_angle_deg: *angle,
                drag_coefficient: *drag,
                mass_kg: *mass,
                caliber_mm: *caliber,
                target_distance_km: distance,
            };
            shot.validate()?;
            Ok(Some(ScenarioConfig::single_shot(shot)))
        }
        _ if values.iter().any(Option::is_some) => Err(format!(
            "射撃パラメータは --{} をすべて指定してください",
            PARAMETER_ARGS.join(", --")
        )
        .into()),
        _ => Ok(None),
    }
}

/// デフォルトヘルプを表示
fn show_default_help() {
    println!("弾道シミュレーション (Projectile Trajectory Simulation) - shotsim v0.1.0");
    println!();
    println!("使用方法:");
    println!("  shotsim [オプション]");
    println!();
    println!("オプション:");
    println!("  -s, --scenario <FILE>  シナリオファイルを指定して実行");
    println!("      --velocity/--angle/--drag/--mass/--caliber <VALUE>");
    println!("                         射撃パラメータを直接指定 (--distance <KM> は任意)");
    println!("      --interactive      射撃パラメータを対話入力");
    println!("  -i, --info             シナリオ情報のみ表示");
    println!("  -o, --output <CSV>     弾道点列をCSVに出力");
    println!("  -v, --verbose          詳細出力 (複数指定で詳細レベル上昇)");
    println!("  -h, --help             このヘルプを表示");
    println!();
    println!("例:");
    println!("  shotsim -s scenarios/howitzer.yaml");
    println!("  shotsim --velocity 300 --angle 45 --drag 0.3 --mass 10 --caliber 120 --distance 5");
    println!("  shotsim --interactive -o output/trajectory.csv");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_flags_build_single_shot() {
        let matches = build_cli().get_matches_from([
            "shotsim", "--velocity", "300", "--angle", "45", "--drag", "0.3", "--mass", "10",
            "--caliber", "120", "--distance", "5",
        ]);
        let scenario = load_scenario(&matches).unwrap().unwrap();
        assert_eq!(scenario.shots.len(), 1);
        assert_eq!(scenario.shots[0].target_distance_km, 5.0);
    }

    #[test]
    fn test_partial_flags_are_rejected() {
        let matches = build_cli().get_matches_from(["shotsim", "--velocity", "300"]);
        assert!(load_scenario(&matches).is_err());
    }

    #[test]
    fn test_no_arguments_means_help() {
        let matches = build_cli().get_matches_from(["shotsim"]);
        assert!(load_scenario(&matches).unwrap().is_none());
    }
}
