//! Cross-process determinism: spawns `scenario1_allof_lcm_fixture` under
//! >= 3 environment/cwd variants and asserts all produce identical output.
//!
//! This proves §8 invariant 2 ("identical inputs ... produce identical
//! plans and items, bit-for-bit") holds across process boundaries, not
//! just within a single `cargo test` process.

use std::path::Path;
use std::process::Command;

fn workspace_root() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_path_buf()
}

/// Resolve the path to a compiled fixture binary.
///
/// `cargo test` puts test binaries in `target/debug/deps/`; the fixture
/// binaries live one directory up, alongside them.
fn binary_path(name: &str) -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push(name);
    path.to_string_lossy().to_string()
}

fn run_variant(bin: &str, work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let mut command = Command::new(bin);
    command.current_dir(work_dir);

    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {bin} (work_dir={work_dir}): {e}"));

    assert!(
        output.status.success(),
        "{bin} exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let bin = binary_path("scenario1_allof_lcm_fixture");
    let root = workspace_root().to_string_lossy().to_string();

    let baseline = run_variant(&bin, &root, &[]);
    assert!(baseline.contains("schema_hash="), "baseline missing schema_hash");
    assert!(baseline.contains("item_0="), "baseline missing item_0");

    let alt_cwd = if cfg!(target_os = "windows") { "C:\\" } else { "/tmp" };
    let variant_cwd = run_variant(&bin, alt_cwd, &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes to {alt_cwd}");

    let variant_locale = run_variant(&bin, &root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    let variant_noise = run_variant(
        &bin,
        &root,
        &[
            ("SDGEN_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("HOME", "/nonexistent"),
        ],
    );
    assert_eq!(baseline, variant_noise, "output differs with spurious env vars");
}

#[test]
fn crossproc_output_matches_in_process_generation() {
    let bin = binary_path("scenario1_allof_lcm_fixture");
    let root = workspace_root().to_string_lossy().to_string();
    let output = run_variant(&bin, &root, &[]);

    let schema = serde_json::json!({
        "allOf": [
            {"type": "integer", "minimum": -5, "multipleOf": 6},
            {"type": "integer", "maximum": 10, "multipleOf": 4}
        ]
    });
    let plan = sdgen_lock_tests::helpers::compose_default(&schema, 1);
    let report = sdgen_lock_tests::helpers::generate_default(&plan, 5, 1);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], format!("schema_hash={}", plan.schema_hash.as_str()));
    for (index, item) in report.items.iter().enumerate() {
        let value = item.as_ref().expect("item generates");
        let bytes = sdgen_kernel::hash::canonical_json_bytes(value).expect("item canonicalizes");
        assert_eq!(lines[index + 1], format!("item_{index}={}", String::from_utf8_lossy(&bytes)));
    }
}
