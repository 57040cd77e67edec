//! End-to-end runs of the binary against a throwaway Go module in dev
//! mode, with answers piped through stdin.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MAKEFILE_TMPL: &str = "BINARY={{ BinaryName }}\nARTIFACT={{ ArtifactName }}\n\n.PHONY: build\nbuild:\n\tgo build -o {{ BinaryName }} {{ MainPath }}\n";

const BUILD_GO_TMPL: &str = "//go:build ignore\n\npackage main\n\nimport \"fmt\"\n\nconst artifactName = \"{{ ArtifactName }}\"\nconst mainPath = \"{{ MainPath }}\"\n\nfunc main() {\nfmt.Println(\"building\", artifactName, \"from\", mainPath)\n}\n";

fn write_module(dir: &Path, module: &str, package: &str) {
    fs::write(dir.join("go.mod"), format!("module {module}\n\ngo 1.22\n")).unwrap();
    fs::write(dir.join("main.go"), format!("package {package}\n")).unwrap();
}

fn write_templates(dir: &Path) {
    fs::write(dir.join("Makefile.tmpl"), MAKEFILE_TMPL).unwrap();
    fs::write(dir.join("build.go.tmpl"), BUILD_GO_TMPL).unwrap();
}

fn gostrap(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gostrap").unwrap();
    cmd.current_dir(project).arg("--dev");
    cmd
}

#[test]
fn test_application_with_all_defaults() {
    let tmp = TempDir::new().unwrap();
    write_module(tmp.path(), "example.com/demo", "main");
    write_templates(tmp.path());

    // makefile? yes; binary name, library?, main path: all defaults
    gostrap(tmp.path())
        .write_stdin("y\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote Makefile"))
        .stdout(predicate::str::contains("wrote build.go"));

    let makefile = fs::read_to_string(tmp.path().join("Makefile")).unwrap();
    assert!(makefile.contains("BINARY=demo"));
    assert!(makefile.contains("ARTIFACT=demo"));
    assert!(makefile.contains("go build -o demo example.com/demo"));

    let build_go = fs::read_to_string(tmp.path().join("build.go")).unwrap();
    assert!(build_go.contains("const artifactName = \"demo\""));
    assert!(build_go.contains("const mainPath = \"example.com/demo\""));
    // the render went through the formatter: body lines are tab indented
    assert!(build_go.contains("\tfmt.Println(\"building\", artifactName, \"from\", mainPath)"));
}

#[test]
fn test_library_derives_artifact_name_and_main_path() {
    let tmp = TempDir::new().unwrap();
    write_module(tmp.path(), "example.com/netkit", "netkit");
    write_templates(tmp.path());

    // makefile? no; binary name "netkit"; library? yes; main path is the
    // module path, resolved without a further prompt
    gostrap(tmp.path())
        .write_stdin("n\nnetkit\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote build.go"));

    assert!(!tmp.path().join("Makefile").exists());

    let build_go = fs::read_to_string(tmp.path().join("build.go")).unwrap();
    assert!(build_go.contains("const artifactName = \"libNetkit\""));
    assert!(build_go.contains("const mainPath = \"example.com/netkit\""));
}

#[test]
fn test_missing_dev_template_aborts_without_output() {
    let tmp = TempDir::new().unwrap();
    write_module(tmp.path(), "example.com/demo", "main");
    // no template files on disk

    gostrap(tmp.path())
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "cannot load dev resource build.go.tmpl",
        ));

    assert!(!tmp.path().join("build.go").exists());
    assert!(!tmp.path().join("Makefile").exists());
}

#[test]
fn test_outside_a_go_module_gives_guidance() {
    let tmp = TempDir::new().unwrap();

    gostrap(tmp.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a recognized Go module"))
        .stderr(predicate::str::contains("go mod init"));
}

#[test]
fn test_malformed_build_template_is_a_fatal_defect() {
    let tmp = TempDir::new().unwrap();
    write_module(tmp.path(), "example.com/demo", "main");
    fs::write(
        tmp.path().join("build.go.tmpl"),
        "package main\n\nfunc main() {\n",
    )
    .unwrap();

    gostrap(tmp.path())
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot gofmt build.go.tmpl"));

    assert!(!tmp.path().join("build.go").exists());
}
