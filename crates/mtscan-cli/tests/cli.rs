use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BIC_TABLE: &str = "\
CODE;NOMS;PAYS
SGCMCMCX;SOCIETE GENERALE CAMEROUN;CMR
CCEICMCX;AFRILAND FIRST BANK;CMR
";

const INCOMING: &str = "\
Message 1
Identifier: fin.202
:20:8101/0650/CM
:32A:240115XAF1500000,00
:52A:IdentifierCode: Code d'identifiant:
SGCMCMCX
:58A:BEACCMCX
Message 2
Identifier: fin.910
:20:BEAC240115001
:32A:240115XAF25000000,
:50A:IdentifierCode:
BEACCMCX091
:52A:CCEICMCX
Message 3
Identifier: fin.103
:20:FT2401600001
:32A:240116EUR12500,50
:52A:ECOCCMCX
:59:/CM2110005000010123456789
";

const OUTGOING: &str = "\
Identifier: fin.202
Sender: ACCESS BANK CAMEROON
:20:6001/0970/GQ/1
:32A:240115XAF900000,00
:52D:
:58A:SGCMCMCX
Identifier: fin.103
Sender: ACCESS BANK CAMEROON
:20:PAY0001
:32A:240115XAF120000,00
:50F:/CM2110005000010
/34/MINISTERE DES FINANCES
DU CAMEROUN
:59:/CM2110005000010999999999
";

fn mtscan() -> Command {
    let mut cmd = Command::cargo_bin("mtscan").unwrap();
    cmd.env_remove("MTSCAN_DATA_DIR");
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bic_codes.csv"), BIC_TABLE).unwrap();
    fs::write(dir.path().join("recus.txt"), INCOMING).unwrap();
    fs::write(dir.path().join("emis.txt"), OUTGOING).unwrap();
    // `;`-separated table
    fs::write(
        dir.path().join("config.json"),
        r#"{ "directory": { "delimiter": ";" } }"#,
    )
    .unwrap();
    dir
}

fn path_arg(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).display().to_string()
}

#[test]
fn process_incoming_json() {
    let dir = workspace();

    mtscan()
        .args(["--config", &path_arg(&dir, "config.json"), "process"])
        .arg(dir.path().join("recus.txt"))
        .args(["--directory", &path_arg(&dir, "bic_codes.csv")])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reference\": \"8101/0650/CM\""))
        .stdout(predicate::str::contains("SOCIETE GENERALE CAMEROUN"))
        .stdout(predicate::str::contains("\"excluded\": 1"))
        .stdout(predicate::str::contains("ECOCCMCX"))
        .stdout(predicate::str::contains("BEAC240115001").not());
}

#[test]
fn process_outgoing_csv() {
    let dir = workspace();

    mtscan()
        .args(["--config", &path_arg(&dir, "config.json"), "process"])
        .arg(dir.path().join("emis.txt"))
        .args(["--direction", "outgoing", "--format", "csv"])
        .args(["--directory", &path_arg(&dir, "bic_codes.csv")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("document,message,type"))
        .stdout(predicate::str::contains("ACCESS BANK CAMEROON"))
        .stdout(predicate::str::contains("SOCIETE GENERALE CAMEROUN"));
}

#[test]
fn process_date_filter() {
    let dir = workspace();

    mtscan()
        .args(["--config", &path_arg(&dir, "config.json"), "process"])
        .arg(dir.path().join("recus.txt"))
        .args(["--directory", &path_arg(&dir, "bic_codes.csv")])
        .args(["--date", "2024-01-16", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FT2401600001"))
        .stdout(predicate::str::contains("8101/0650/CM").not());
}

#[test]
fn process_missing_input_fails() {
    mtscan()
        .args(["process", "/nonexistent/export.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_missing_table_fails() {
    let dir = workspace();

    mtscan()
        .args(["--config", &path_arg(&dir, "config.json"), "process"])
        .arg(dir.path().join("recus.txt"))
        .args(["--directory", &path_arg(&dir, "absent.csv")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.csv"));
}

#[test]
fn directory_add_then_lookup() {
    let dir = workspace();
    let config = path_arg(&dir, "config.json");
    let table = path_arg(&dir, "bic_codes.csv");

    mtscan()
        .args(["--config", &config, "directory", "--directory", &table, "lookup", "ECOCCMCX"])
        .assert()
        .failure();

    mtscan()
        .args(["--config", &config, "directory", "--directory", &table])
        .args(["add", "ecoccmcx", "ECOBANK CAMEROUN", "cmr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added ECOCCMCX"));

    mtscan()
        .args(["--config", &config, "directory", "--directory", &table, "lookup", "ECOCCMCX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ECOBANK CAMEROUN"))
        .stdout(predicate::str::contains("CMR"));

    let content = fs::read_to_string(dir.path().join("bic_codes.csv")).unwrap();
    assert!(content.ends_with("ECOCCMCX;ECOBANK CAMEROUN;CMR\n"));
}

#[test]
fn directory_add_rejects_duplicate() {
    let dir = workspace();

    mtscan()
        .args(["--config", &path_arg(&dir, "config.json"), "directory"])
        .args(["--directory", &path_arg(&dir, "bic_codes.csv")])
        .args(["add", "SGCMCMCX", "OTHER BANK", "CMR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already mapped"));
}

#[test]
fn batch_writes_summary() {
    let dir = workspace();
    let out = dir.path().join("out");
    let pattern = dir.path().join("*.txt").display().to_string();

    mtscan()
        .args(["--config", &path_arg(&dir, "config.json"), "batch", &pattern])
        .args(["--directory", &path_arg(&dir, "bic_codes.csv")])
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "-j", "2"])
        .assert()
        .success();

    assert!(out.join("recus.txt.json").exists());
    assert!(out.join("emis.txt.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    // header plus 2 records per file, files in name order
    assert_eq!(summary.lines().count(), 5);
    assert!(summary.lines().nth(1).unwrap().starts_with("emis.txt"));

    let missing = fs::read_to_string(out.join("missing_codes.csv")).unwrap();
    assert!(missing.contains("unmapped,ECOCCMCX"));
}

#[test]
fn config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.json");
    let config_arg = config.display().to_string();

    mtscan()
        .args(["--config", &config_arg, "config", "init"])
        .assert()
        .success();
    assert!(Path::new(&config).exists());

    mtscan()
        .args(["--config", &config_arg, "config", "set", "extraction.default_direction", "outgoing"])
        .assert()
        .success();

    mtscan()
        .args(["--config", &config_arg, "config", "get", "extraction.default_direction"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outgoing\""));

    mtscan()
        .args(["--config", &config_arg, "config", "set", "extraction.default_direction", "sideways"])
        .assert()
        .failure();
}
