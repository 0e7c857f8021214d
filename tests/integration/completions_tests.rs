//! Completion generation over a full registry.

use cmdtrie::completions::{command_tree, write_completions, Shell};

use crate::common::generator_registry;

#[test]
fn test_tree_covers_nested_groups() {
    let tree = command_tree(&generator_registry(), "prog");
    assert_eq!(tree.get_name(), "prog");
    let db = tree.find_subcommand("db").expect("db node");
    assert!(db.find_subcommand("migrate").is_some());
    let generate = tree.find_subcommand("generate").expect("generate node");
    assert!(generate.find_subcommand("model").is_some());
    assert!(generate.find_subcommand("migration").is_some());
}

#[test]
fn test_root_alias_spellings_survive() {
    let tree = command_tree(&generator_registry(), "prog");
    let version = tree.find_subcommand("version").expect("version node");
    let mut aliases: Vec<&str> = version.get_all_aliases().collect();
    aliases.sort_unstable();
    assert_eq!(aliases, ["--version", "-v", "v"]);
}

#[test]
fn test_leaf_carries_declared_flags() {
    let tree = command_tree(&generator_registry(), "prog");
    let model = tree
        .find_subcommand("generate")
        .and_then(|generate| generate.find_subcommand("model"))
        .expect("model node");
    let longs: Vec<&str> = model.get_arguments().filter_map(clap::Arg::get_long).collect();
    assert!(longs.contains(&"skip-migration"), "{longs:?}");
}

#[test]
fn test_descriptions_become_about_lines() {
    let tree = command_tree(&generator_registry(), "prog");
    let new = tree.find_subcommand("new").expect("new node");
    assert_eq!(new.get_about().map(ToString::to_string).as_deref(), Some("Create a project"));
}

#[test]
fn test_scripts_cover_nested_commands() {
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        let mut out = Vec::new();
        write_completions(&generator_registry(), "prog", shell, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("migrate"), "{shell:?}");
        assert!(script.contains("model"), "{shell:?}");
    }
}
