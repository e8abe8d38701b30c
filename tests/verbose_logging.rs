#![cfg(feature = "verbose-logging")]

use hexcheck::verify::compare_hexdumps;

#[test]
fn comparison_runs_with_debug_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
    let report = compare_hexdumps("00 00 80 3f |...?", "00 00 80 3f |...?").unwrap();
    assert_eq!(report.max_abs, 0.0);
}
