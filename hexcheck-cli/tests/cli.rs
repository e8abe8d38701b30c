use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;

fn data(name: &str) -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../tests/data")).join(name)
}

fn hexcheck() -> Command {
    Command::cargo_bin("hexcheck").unwrap()
}

#[test]
fn decode_prints_one_sample_per_line() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("two.hex");
    fs::write(&path, "00 00 80 3f 00 00 20 40 |...?... @\n").unwrap();
    let out = hexcheck().arg("decode").arg(&path).output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "1\n2.5\n");
}

#[test]
fn decode_rejects_malformed_dump() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bad.hex");
    fs::write(&path, "00 zz 80 3f |....\n").unwrap();
    hexcheck().arg("decode").arg(&path).assert().failure();
}

#[test]
fn encode_then_decode_matches_input() {
    let tmp = tempfile::tempdir().unwrap();
    let samples = tmp.path().join("samples.txt");
    fs::write(&samples, "1.0f, -2.5, 0.125").unwrap();
    let out = hexcheck().arg("encode").arg(&samples).output().unwrap();
    assert!(out.status.success());

    let dump = tmp.path().join("samples.hex");
    fs::write(&dump, &out.stdout).unwrap();
    let out = hexcheck().arg("decode").arg(&dump).output().unwrap();
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "1\n-2.5\n0.125\n");
}

#[test]
fn compare_identical_device_outputs() {
    let out = hexcheck()
        .arg("compare")
        .arg(data("filter_sample.hex"))
        .arg(data("filter_block.hex"))
        .args(["--max-abs", "0"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout).unwrap().contains("[ok]"));
}

#[test]
fn compare_fails_outside_tolerance() {
    let out = hexcheck()
        .arg("compare")
        .arg(data("input.hex"))
        .arg(data("filter_sample.hex"))
        .args(["--max-abs", "1"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8(out.stdout).unwrap().contains("[FAIL]"));
}

#[test]
fn compare_rejects_length_mismatch() {
    let tmp = tempfile::tempdir().unwrap();
    let short = tmp.path().join("short.hex");
    fs::write(&short, "00 00 80 3f |...?\n").unwrap();
    hexcheck()
        .arg("compare")
        .arg(data("input.hex"))
        .arg(&short)
        .assert()
        .failure();
}

#[test]
fn run_device_manifest_passes() {
    let out = hexcheck()
        .arg("run")
        .arg(data("manifest.json"))
        .output()
        .unwrap();
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(out.status.success(), "{}", stdout);
    assert!(stdout.contains("filter outputs identical: true"));
    assert_eq!(stdout.matches("[ok]").count(), 3);
}

#[test]
fn run_reports_json() {
    let out = hexcheck()
        .args(["run", "--json"])
        .arg(data("manifest.json"))
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["filter_outputs_identical"], true);
    let checks = report["checks"].as_array().unwrap();
    assert_eq!(checks.len(), 3);
    assert_eq!(checks[0]["name"], "filter");
    assert!(checks[0]["max_abs"].as_f64().unwrap() < 1e-3);
    assert!(checks.iter().all(|c| c["passed"] == true));
}

#[test]
fn run_fails_with_tight_tolerance() {
    let tmp = tempfile::tempdir().unwrap();
    let manifest = tmp.path().join("tight.json");
    let text = format!(
        r#"{{
            "input": {{ "hexdump": {:?} }},
            "rfft": {{
                "output": {:?},
                "size": 1024,
                "magnitude_tolerance": {{ "max_abs": 1e-9 }}
            }}
        }}"#,
        data("input.hex"),
        data("rfft.hex"),
    );
    fs::write(&manifest, text).unwrap();
    let out = hexcheck().arg("run").arg(&manifest).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8(out.stdout)
        .unwrap()
        .contains("rfft magnitude"));
}

#[test]
fn run_regenerates_tones_and_reads_cmsis_coefficients() {
    let tmp = tempfile::tempdir().unwrap();
    let manifest = tmp.path().join("tones.json");
    let text = format!(
        r#"{{
            "input": {{ "tones": {{
                "sample_rate": 50.0,
                "samples": 1024,
                "tones": [
                    {{ "freq": 1.0, "amp": 100.0 }},
                    {{ "freq": 5.0, "amp": 20.0 }},
                    {{ "freq": 10.0, "amp": 300.0 }},
                    {{ "freq": 15.0, "amp": 1.0 }}
                ]
            }} }},
            "filter": {{
                "coefficients": {{ "cmsis": [[
                    0.3882367585514254, 0.0, -0.3882367585514254,
                    0.8517671875043377, -0.22352648289714921
                ]] }},
                "outputs": [{:?}],
                "tolerance": {{ "max_abs": 1e-3 }}
            }},
            "rfft": {{
                "output": {:?},
                "size": 1024,
                "magnitude_tolerance": {{ "max_abs": 0.1 }}
            }}
        }}"#,
        data("filter_sample.hex"),
        data("rfft.hex"),
    );
    fs::write(&manifest, text).unwrap();
    let out = hexcheck()
        .args(["run", "--json"])
        .arg(&manifest)
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let filter = &report["checks"][0];
    assert_eq!(filter["name"], "filter");
    assert_eq!(filter["passed"], true);
    assert!(filter["max_abs"].as_f64().unwrap() < 1e-3);
    assert_eq!(report["checks"][1]["passed"], true);
}

#[test]
fn decoded_non_finite_samples_encode_again() {
    let tmp = tempfile::tempdir().unwrap();
    let samples = tmp.path().join("special.txt");
    fs::write(&samples, "inf -inf 1.0\n").unwrap();
    let out = hexcheck().arg("encode").arg(&samples).output().unwrap();
    assert!(out.status.success());

    let dump = tmp.path().join("special.hex");
    fs::write(&dump, &out.stdout).unwrap();
    let out = hexcheck().arg("decode").arg(&dump).output().unwrap();
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "inf\n-inf\n1\n");
}
