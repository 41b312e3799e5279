//! Integration tests for the silverghost facade
//!
//! Drives a configured store through navigation events, with a service
//! standing in for the backend that answers REQUEST actions.

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use silverghost::*;

const CONFIG: &str = r#"
[list]
default_page_size = 2

[[action]]
name = "WELCOME"
reducer_key = "welcome"
pathname = "/welcome/:channel/:query"
[action.pathgroups]
channel = ["room", "broadcast"]

[[action]]
name = "TREE"
reducer_key = "tree"
pathname = "/tree/:level0/:level1/:level2"
[action.pathgroups]
level0 = []
level1 = [[]]
level2 = [[[]]]
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn messages(channel: &str, page: u64) -> Vec<Value> {
    (0..2)
        .map(|index| json!(format!("{channel}-{}", page * 2 + index)))
        .collect()
}

/// Answers WELCOME requests with `[draft, page]` and TREE requests with the
/// children of the expanded node
fn backend(config: &Config) -> impl Fn(&ActionInstance, &Store) -> Option<ActionInstance> {
    let page_size = config.list.pagination();
    move |action: &ActionInstance, store: &Store| {
        let definition = action.definition.clone()?;
        if definition.request_type() != action.action_type {
            return None;
        }
        let params = store.params(action).ok()?;
        let data = InstanceProperties::data().params(params.clone());

        match definition.reducer_key() {
            Some("welcome") => {
                let channel = params.first()?.as_str()?.to_string();
                let number = action.pagination.number.unwrap_or(0);
                let pagination = Pagination {
                    number: Some(number),
                    total_elements: Some(5),
                    ..page_size.clone()
                };
                Some(definition.instance(
                    data.pagination(pagination)
                        .payload(json!([null, messages(&channel, number)])),
                ))
            }
            Some("tree") => {
                let parent = params
                    .iter()
                    .rev()
                    .find_map(Value::as_str)
                    .unwrap_or("");
                let child = format!("{parent}_0");
                Some(definition.instance(data.payload(json!({
                    child.clone(): {"label": child, "leaf": false, "expanded": false},
                    "expanded": true
                }))))
            }
            _ => None,
        }
    }
}

fn store(config: &Config) -> Store {
    let router = config.router().unwrap();
    let welcome = Arc::clone(router.get("@@App/WELCOME").unwrap());
    let tree = Arc::clone(router.get("@@App/TREE").unwrap());

    let root = tree.instance(
        InstanceProperties::data()
            .params(vec![])
            .payload(json!({"_0": {"label": "_0", "leaf": false, "expanded": false}})),
    );

    Store::builder(router)
        .with_slice(
            "welcome",
            accumulate(
                Split::new([Arc::clone(&welcome)])
                    .with(DefaultReducer::new(None, [Arc::clone(&welcome)]))
                    .with(config.list.list_reducer(None, [Arc::clone(&welcome)])),
            ),
        )
        .with_slice("tree", collect(accumulate(DefaultReducer::new(Some(root), [tree]))))
        .with_slice("errors", ErrorLogReducer)
        .with_service(backend(config))
        .build()
}

fn list_at(store: &Store, branch: &[&str]) -> ListResult {
    let slot = store
        .state("welcome")
        .and_then(|state| state.payload.get_in(branch))
        .and_then(|slots| slots.get_index(1))
        .unwrap();
    ListResult::from_node(slot).unwrap().unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_load_from_file() {
    let path = std::env::temp_dir().join(format!("silverghost-{}.toml", std::process::id()));
    fs::write(&path, CONFIG).unwrap();

    let config = Config::load(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(config.list.default_page_size, 2);
    let router = config.router().unwrap();
    let types: Vec<_> = router.definitions().iter().map(|def| def.action_type()).collect();
    assert_eq!(types, vec!["@@App/WELCOME", "@@App/TREE"]);
    assert_eq!(
        router.get("@@App/TREE").unwrap().pathgroups().get("level1"),
        Some(&PathgroupValue::nested([PathgroupValue::open()]))
    );
}

#[test]
fn test_config_load_missing_file_is_default() {
    let config = Config::load(std::env::temp_dir().join("silverghost-does-not-exist.toml")).unwrap();
    assert!(config.actions.is_empty());
}

// ============================================================================
// Navigation flows
// ============================================================================

#[test]
fn test_navigation_fills_list_per_channel() {
    init_tracing();
    let config = Config::from_toml_str(CONFIG).unwrap();
    let mut store = store(&config);

    store.navigate(Location::parse("/welcome/room/hi")).unwrap();
    assert_eq!(store.location().pathname, "/welcome/room/hi");
    assert_eq!(list_at(&store, &["room", "hi"]).list, messages("room", 0));

    store.navigate(Location::parse("/welcome/broadcast/hi")).unwrap();
    assert_eq!(list_at(&store, &["broadcast", "hi"]).list, messages("broadcast", 0));
    assert_eq!(list_at(&store, &["room", "hi"]).list, messages("room", 0));
}

#[test]
fn test_next_page_request_extends_list() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let mut store = store(&config);
    store.navigate(Location::parse("/welcome/room")).unwrap();

    let first = list_at(&store, &["room"]);
    assert_eq!(first.next_page.number, Some(1));

    let welcome = Arc::clone(store.router().get("@@App/WELCOME").unwrap());
    let previous = store.state("welcome").unwrap().clone();
    let request = welcome.propagate(
        &previous,
        InstanceProperties::request()
            .params(vec![json!("room")])
            .pagination(Pagination::new(1, 2)),
    );
    store.dispatch(request).unwrap();

    let result = list_at(&store, &["room"]);
    let mut expected = messages("room", 0);
    expected.extend(messages("room", 1));
    assert_eq!(result.list, expected);
    assert_eq!(result.next_page.number, Some(2));
}

#[test]
fn test_tree_expansion_keeps_labels() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let mut store = store(&config);

    store.navigate(Location::parse("/tree/_0")).unwrap();
    store.navigate(Location::parse("/tree/_0/_0_0")).unwrap();

    let tree = &store.state("tree").unwrap().payload;
    assert_eq!(tree.get_in(&["_0", "label"]), Some(&Node::from("_0")));
    assert_eq!(tree.get_in(&["_0", "expanded"]), Some(&Node::from(true)));
    assert_eq!(tree.get_in(&["_0", "_0_0", "label"]), Some(&Node::from("_0_0")));
    assert_eq!(tree.get_in(&["_0", "_0_0", "expanded"]), Some(&Node::from(true)));
    assert_eq!(
        tree.get_in(&["_0", "_0_0", "_0_0_0", "label"]),
        Some(&Node::from("_0_0_0"))
    );
}

#[test]
fn test_unmatched_navigation_changes_location_only() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let mut store = store(&config);
    let before = store.state("tree").cloned();

    store.navigate(Location::parse("/nowhere")).unwrap();

    assert_eq!(store.location().pathname, "/nowhere");
    assert_eq!(store.state("tree").cloned(), before);
    assert!(store.state("welcome").is_none());
}
