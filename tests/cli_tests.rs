//! Integration tests for the tooltipgen CLI
//!
//! These tests run the built binary and check exit codes and output.

use std::process::{Command, Output};

fn tooltipgen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tooltipgen"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tooltipgen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_wrap_prints_one_line_per_row() {
    let output = tooltipgen(&["wrap", "&cHello this is a long line of lore text", "--max", "10"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.len() >= 2);
    assert!(lines.iter().all(|l| l.starts_with("&c")));
}

#[test]
fn test_parse_expands_placeholders() {
    let output = tooltipgen(&["parse", "%%REQUIRE:Combat Level 5%%"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Requires Combat Level 5"));
}

#[test]
fn test_key_is_stable() {
    let args = ["key", "--name", "Stick", "--rarity", "common"];
    let first = stdout(&tooltipgen(&args));
    let second = stdout(&tooltipgen(&args));
    assert_eq!(first, second);
    assert!(first.contains("TooltipGenerator|"));
}

#[test]
fn test_tooltip_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("stick.png");
    let output = tooltipgen(&["tooltip", "--name", "Stick", "--rarity", "rare", "-o", out.to_str().unwrap()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(image::open(&out).is_ok());
}

#[test]
fn test_unknown_rarity_exits_with_invalid_args() {
    let output = tooltipgen(&["key", "--name", "Stick", "--rarity", "shiny"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_out_of_range_line_length_exits_with_invalid_args() {
    let output = tooltipgen(&["key", "--name", "Stick", "--max-line-length", "500"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_resources_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = tooltipgen(&["item", "stick", "--resources", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_parse_reverse_restores_placeholders() {
    let output = tooltipgen(&["parse", "--reverse", "§c+5 ❁ Strength§r"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "%%STRENGTH:+5 %%");
}

#[test]
fn test_nbt_print_shows_imported_markup() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("item.json");
    std::fs::write(
        &file,
        r#"{"id": "minecraft:iron_sword", "tag": {"display": {"Name": "§fIron Sword", "Lore": ["§7Damage: §c+30"]}}}"#,
    )
    .unwrap();

    let output = tooltipgen(&["nbt", file.to_str().unwrap(), "--print"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "&fIron Sword\n%%ITEM_STAT_RED:Damage:+30%%\n");
}

#[test]
fn test_nbt_without_id_exits_with_invalid_args() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("item.json");
    std::fs::write(&file, r#"{"tag": {}}"#).unwrap();

    let output = tooltipgen(&["nbt", file.to_str().unwrap(), "--print"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_inventory_without_slot_exits_with_invalid_args() {
    let output = tooltipgen(&["inventory", "stone"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing a valid slot separator"));
}
