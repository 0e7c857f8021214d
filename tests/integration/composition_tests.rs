//! Registry composition: merging independently built command trees.
//!
//! Models the plugin workflow where a host registry folds in trees built by
//! other crates, with conflicts, suppressions, aliases, and callbacks.

use std::sync::{Arc, Mutex};

use cmdtrie::{dispatch, Bindings, Callback, CommandSpec, DispatchOutcome, Registry, RenderOptions};

use crate::common::{argv, command};

type Log = Arc<Mutex<Vec<String>>>;

fn tagged_command(name: &str, tag: &str, log: &Log) -> CommandSpec {
    let sink = Arc::clone(log);
    let tag = tag.to_string();
    CommandSpec::new(name, move |_: &Bindings| -> anyhow::Result<()> {
        sink.lock().unwrap().push(tag.clone());
        Ok(())
    })
}

fn tagged_callback(tag: &str, log: &Log) -> Callback {
    let sink = Arc::clone(log);
    let tag = tag.to_string();
    Callback::closure(move |_, _| {
        sink.lock().unwrap().push(tag.clone());
        Ok(())
    })
}

#[test]
fn test_merge_combines_disjoint_trees() {
    let mut host = Registry::new();
    host.register("new", Some(command("new"))).unwrap();
    host.register("version", Some(command("version"))).unwrap();

    let mut plugin = Registry::new();
    plugin.register("db migrate", Some(command("db migrate"))).unwrap();
    plugin.register("db rollback", Some(command("db rollback"))).unwrap();

    host.merge(plugin);
    for path in [&["new"][..], &["version"], &["db", "migrate"], &["db", "rollback"]] {
        assert!(host.lookup(path).found(), "{path:?}");
    }
    let names: Vec<String> = host.root_briefs().into_iter().map(|b| b.name).collect();
    assert_eq!(names, ["db", "new", "version"]);
}

#[test]
fn test_merge_conflict_takes_the_merged_side() {
    let mut host = Registry::new();
    host.register("deploy", Some(command("host deploy"))).unwrap();

    let mut plugin = Registry::new();
    plugin.register("deploy", Some(command("plugin deploy"))).unwrap();

    host.merge(plugin);
    let hit = host.lookup(&["deploy"]);
    assert_eq!(hit.command().unwrap().get_name(), "plugin deploy");
}

#[test]
fn test_merge_carries_suppression() {
    let mut host = Registry::new();
    host.register("legacy", Some(command("legacy"))).unwrap();
    host.register("legacy run", Some(command("legacy run"))).unwrap();

    let mut plugin = Registry::new();
    plugin.register("legacy", None).unwrap();

    host.merge(plugin);
    assert!(!host.lookup(&["legacy"]).found());
    assert!(host.lookup(&["legacy", "run"]).found());
}

#[test]
fn test_merge_reregistration_lifts_suppression() {
    let mut host = Registry::new();
    host.register("tool", Some(command("tool"))).unwrap();
    host.register("tool", None).unwrap();

    let mut plugin = Registry::new();
    plugin.register("tool", Some(command("tool again"))).unwrap();

    host.merge(plugin);
    let hit = host.lookup(&["tool"]);
    assert!(hit.found());
    assert_eq!(hit.command().unwrap().get_name(), "tool again");
}

#[test]
fn test_merge_appends_callback_chains_in_order() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let mut host = Registry::new();
    host.register("sync", Some(tagged_command("sync", "host action", &log))).unwrap();
    host.register_before("sync", tagged_callback("host before", &log)).unwrap();

    let mut plugin = Registry::new();
    plugin.register("sync", Some(tagged_command("sync", "plugin action", &log))).unwrap();
    plugin.register_before("sync", tagged_callback("plugin before", &log)).unwrap();
    plugin.register_after("sync", tagged_callback("plugin after", &log)).unwrap();

    host.merge(plugin);
    let outcome = dispatch(&host, "prog", &argv(&["sync"]), &RenderOptions::default());
    assert!(matches!(outcome, DispatchOutcome::Completed));
    assert_eq!(
        *log.lock().unwrap(),
        ["host before", "plugin before", "plugin action", "plugin after"]
    );
}

#[test]
fn test_merge_retargets_aliases() {
    let mut host = Registry::new();
    host.register("log", Some(command("log"))).unwrap();

    let mut plugin = Registry::new();
    plugin
        .register_with_aliases("status", Some(command("status")), &["st"])
        .unwrap();

    host.merge(plugin);
    let hit = host.lookup(&["st"]);
    assert!(hit.found());
    assert_eq!(hit.command().unwrap().get_name(), "status");
}

#[test]
fn test_merge_into_empty_registry() {
    let mut plugin = Registry::new();
    plugin.register("generate model", Some(command("generate model"))).unwrap();

    let mut host = Registry::new();
    host.merge(plugin);
    assert!(host.lookup(&["generate", "model"]).found());
    assert!(!host.lookup(&["generate"]).found());
}
