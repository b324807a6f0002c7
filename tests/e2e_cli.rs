//! End-to-end CLI tests for `dtscompat`.
//!
//! Exercises the built binary exactly as a user would: two `.d.ts` files on
//! disk, real process spawn, assertions on stdout/stderr/exit code.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn dtscompat() -> Command {
    cargo_bin_cmd!("dtscompat")
}

fn write_dts(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".d.ts").expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

mod cli_basics {
    use super::*;

    #[test]
    fn shows_help() {
        dtscompat()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("dtscompat"))
            .stdout(predicate::str::contains("--policy"));
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let old = write_dts("export declare function f(): void;");
        dtscompat()
            .arg(old.path())
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("[dtscompat][error]"));
    }

    #[test]
    fn missing_file_is_a_hard_error() {
        dtscompat()
            .arg("does-not-exist-old.d.ts")
            .arg("does-not-exist-new.d.ts")
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("[dtscompat][error]"))
            .stderr(predicate::str::contains("[dtscompat][hint]"));
    }
}

mod exit_codes {
    use super::*;

    #[test]
    fn identical_files_exit_zero() {
        let old = write_dts("export declare function f(x: string): void;");
        let new = write_dts("export declare function f(x: string): void;");
        dtscompat()
            .arg(old.path())
            .arg(new.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Overall release type: none"));
    }

    #[test]
    fn added_required_parameter_exits_one() {
        let old = write_dts("export declare function f(x: string): void;");
        let new = write_dts("export declare function f(x: string, y: number): void;");
        dtscompat()
            .arg(old.path())
            .arg(new.path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Overall release type: major"));
    }

    #[test]
    fn removed_symbol_exits_one() {
        let old = write_dts("export declare function f(): void;\nexport declare function g(): void;");
        let new = write_dts("export declare function f(): void;");
        dtscompat()
            .arg(old.path())
            .arg(new.path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Breaking:"));
    }

    #[test]
    fn added_optional_parameter_is_minor_and_exits_zero() {
        let old = write_dts("export declare function f(x: string): void;");
        let new = write_dts("export declare function f(x: string, y?: number): void;");
        dtscompat()
            .arg(old.path())
            .arg(new.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Overall release type: minor"));
    }
}

mod policies {
    use super::*;

    #[test]
    fn unknown_policy_is_a_usage_error() {
        let old = write_dts("export declare function f(): void;");
        let new = write_dts("export declare function f(): void;");
        dtscompat()
            .args(["--policy", "nonsense"])
            .arg(old.path())
            .arg(new.path())
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("unknown policy"));
    }

    #[test]
    fn read_only_policy_can_be_selected() {
        let old = write_dts("export declare function f(x: string): void;");
        let new = write_dts("export declare function f(x: string, y: number): void;");
        dtscompat()
            .args(["--policy", "read-only"])
            .arg(old.path())
            .arg(new.path())
            .assert()
            .success();
    }
}

mod output_formats {
    use super::*;

    #[test]
    fn json_output_is_valid_json_with_expected_shape() {
        let old = write_dts("export declare function f(): void;");
        let new = write_dts("export declare function f(x: string): void;");
        let output = dtscompat()
            .args(["--json"])
            .arg(old.path())
            .arg(new.path())
            .output()
            .expect("run dtscompat");

        assert!(output.status.code() == Some(1) || output.status.code() == Some(0));
        let parsed: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout is valid JSON");
        assert!(parsed.get("release_type").is_some());
        assert!(parsed.get("changes_by_impact").is_some());
        assert!(parsed.get("stats").is_some());
    }

    #[test]
    fn custom_filenames_appear_in_text_report() {
        let old = write_dts("export declare function f(): void;");
        let new = write_dts("export declare function f(x: string): void;");
        dtscompat()
            .args(["--old-filename", "v1.d.ts", "--new-filename", "v2.d.ts"])
            .arg(old.path())
            .arg(new.path())
            .assert()
            .stdout(predicate::str::contains("f"));
    }
}

mod library_resolution {
    use super::*;
    use std::fs;

    #[test]
    fn lib_dir_resolves_an_unresolved_type_reference() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(
            dir.path().join("shared.d.ts"),
            "export interface Shared { a: string; }",
        )
        .expect("write shared.d.ts");

        let old = write_dts(
            "import { Shared } from './shared';\nexport declare function f(): Shared;",
        );
        let new = write_dts(
            "import { Shared } from './shared';\nexport declare function f(): Shared;",
        );

        dtscompat()
            .args(["--lib-dir"])
            .arg(dir.path())
            .arg(old.path())
            .arg(new.path())
            .assert()
            .success();
    }
}
