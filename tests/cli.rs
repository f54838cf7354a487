use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SECURE_POD: &str = "apiVersion: v1
kind: Pod
metadata:
  name: web
  namespace: shop
  labels:
    app: web
spec:
  containers:
    - name: web
      image: web:1
      securityContext:
        runAsUser: 20000
        runAsGroup: 20000
        readOnlyRootFilesystem: true
---
apiVersion: networking.k8s.io/v1
kind: NetworkPolicy
metadata:
  name: web
  namespace: shop
spec:
  podSelector:
    matchLabels:
      app: web
  policyTypes: [Ingress, Egress]
";

const PRIVILEGED_POD: &str = "apiVersion: v1
kind: Pod
metadata:
  name: root
spec:
  containers:
    - name: root
      image: root:1
      securityContext:
        privileged: true
";

fn kube_scorecard() -> Command {
    let mut cmd = Command::cargo_bin("kube-scorecard").unwrap();
    cmd.arg("--no-color");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn clean_input_exits_zero() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pod.yaml", SECURE_POD);

    kube_scorecard()
        .arg("score")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no problems found"));
}

#[test]
fn critical_grade_exits_one() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pod.yaml", PRIVILEGED_POD);

    kube_scorecard()
        .arg("score")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[CRITICAL] Container Security Context Privileged",
        ));
}

#[test]
fn ignore_flag_drops_the_check() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pod.yaml", PRIVILEGED_POD);

    kube_scorecard()
        .args(["score", "-o", "json"])
        .arg(&path)
        .args([
            "--ignore-test",
            "container-security-context-privileged",
            "--ignore-test",
            "container-security-context-user-group-id",
            "--ignore-test",
            "container-security-context-readonlyrootfilesystem",
            "--ignore-test",
            "pod-networkpolicy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ignored\""));
}

#[test]
fn decode_failure_exits_two() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "bad.yaml",
        "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: x\nspec:\n  replicas: many\n",
    );

    kube_scorecard()
        .arg("score")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad.yaml"));
}

#[test]
fn missing_file_exits_two() {
    kube_scorecard()
        .args(["score", "/does/not/exist.yaml"])
        .assert()
        .code(2);
}

#[test]
fn reads_stdin_and_directories() {
    kube_scorecard()
        .args(["score", "-"])
        .write_stdin(SECURE_POD)
        .assert()
        .success();

    let dir = TempDir::new().unwrap();
    write(&dir, "a.yaml", SECURE_POD);
    write(&dir, "b.yml", PRIVILEGED_POD);
    kube_scorecard()
        .arg("score")
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("v1/Pod root"));
}

#[test]
fn list_prints_catalogue() {
    kube_scorecard()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("container-seccomp-profile"))
        .stdout(predicate::str::contains("(optional)"));
}

#[test]
fn version_prints_banner() {
    kube_scorecard()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("kube-scorecard "));
}
