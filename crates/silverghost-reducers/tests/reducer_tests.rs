//! Integration tests for silverghost-reducers
//!
//! Exercises the reducer algebra the way applications compose it:
//! accumulate over split over leaf reducers, collect over accumulate, and
//! the list page cache across successive dispatches.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use silverghost_actions::*;
use silverghost_reducers::*;

fn welcome() -> Arc<ActionDefinition> {
    Arc::new(
        ActionDefinition::new("@@App/WELCOME")
            .with_reducer_key("welcome")
            .with_pathname("/welcome/:channel/:query")
            .with_pathgroup("channel", PathgroupValue::options(["room", "broadcast"])),
    )
}

fn tree() -> Arc<ActionDefinition> {
    Arc::new(
        ActionDefinition::new("@@App/TREE")
            .with_reducer_key("tree")
            .with_pathname("/tree/:level0/:level1/:level2")
            .with_pathgroup("level0", PathgroupValue::open())
            .with_pathgroup("level1", PathgroupValue::nested([PathgroupValue::open()]))
            .with_pathgroup(
                "level2",
                PathgroupValue::nested([PathgroupValue::nested([PathgroupValue::open()])]),
            ),
    )
}

fn channel() -> Arc<ActionDefinition> {
    Arc::new(
        ActionDefinition::new("@@App/CHANNEL")
            .with_pathname("/channel/:channel")
            .with_pathgroup("channel", PathgroupValue::options(["room", "broadcast"])),
    )
}

fn data(definition: &Arc<ActionDefinition>, params: Vec<Value>, payload: Value) -> ActionInstance {
    definition.instance(InstanceProperties::data().params(params).payload(payload))
}

fn page(
    definition: &Arc<ActionDefinition>,
    number: u64,
    sorting: Sorting,
    items: Value,
) -> ActionInstance {
    definition.instance(
        InstanceProperties::data()
            .params(vec![])
            .pagination(Pagination::new(number, 2).with_total(6))
            .sorting(sorting)
            .filter(vec![FilterCriterion::new("message", "contains", json!(""))])
            .payload(items),
    )
}

fn list_of(state: &ActionInstance) -> ListResult {
    ListResult::from_node(&state.payload)
        .expect("valid list result")
        .expect("list result")
}

// ============================================================================
// accumulate
// ============================================================================

#[test]
fn test_accumulate_branch_isolation() {
    let def = channel();
    let reducer = accumulate(DefaultReducer::new(None, [Arc::clone(&def)]));

    let room = data(&def, vec![json!("room")], json!({"messages": [1, 2]}));
    let state = reducer.reduce(None, &room).unwrap().unwrap();

    let broadcast = data(&def, vec![json!("broadcast")], json!({"messages": [3]}));
    let next = reducer.reduce(Some(&state), &broadcast).unwrap().unwrap();

    assert_eq!(
        next.payload.to_value(),
        json!({"room": {"messages": [1, 2]}, "broadcast": {"messages": [3]}})
    );
    // the untouched branch is the very same branch
    assert!(next
        .payload
        .get("room")
        .unwrap()
        .shares_with(state.payload.get("room").unwrap()));

    let again = data(&def, vec![json!("broadcast")], json!({"messages": [4]}));
    let last = reducer.reduce(Some(&next), &again).unwrap().unwrap();
    assert_eq!(last.payload.get_in(&["broadcast", "messages"]), Some(&Node::from(json!([4]))));
    assert!(last
        .payload
        .get("room")
        .unwrap()
        .shares_with(state.payload.get("room").unwrap()));
}

#[test]
fn test_accumulate_defaults_implicit_branch() {
    let def = channel();
    let reducer = accumulate(DefaultReducer::new(None, [Arc::clone(&def)]));

    let unnamed = data(&def, vec![], json!("hello"));
    let state = reducer.reduce(None, &unnamed).unwrap().unwrap();
    assert_eq!(state.payload.to_value(), json!({"room": "hello"}));
}

#[test]
fn test_accumulate_nests_explicit_params() {
    let def = welcome();
    let reducer = accumulate(DefaultReducer::new(None, [Arc::clone(&def)]));

    let action = data(&def, vec![json!("broadcast"), json!("news")], json!([1]));
    let state = reducer.reduce(None, &action).unwrap().unwrap();
    assert_eq!(state.payload.to_value(), json!({"broadcast": {"news": [1]}}));
}

// ============================================================================
// collect
// ============================================================================

#[test]
fn test_collect_over_accumulate_expands_tree() {
    let def = tree();
    let root = data(
        &def,
        vec![],
        json!({"_0": {"label": "_0", "leaf": false, "expanded": false}}),
    );
    let reducer = collect(accumulate(DefaultReducer::new(
        Some(root.clone()),
        [Arc::clone(&def)],
    )));
    assert_eq!(reducer.initial_state(), Some(root.clone()));

    let expand = data(
        &def,
        vec![json!("_0")],
        json!({
            "_0_0": {"label": "_0_0", "leaf": false, "expanded": false},
            "expanded": true
        }),
    );
    let state = reducer.reduce(Some(&root), &expand).unwrap().unwrap();
    assert_eq!(
        state.payload.to_value(),
        json!({
            "_0": {
                "label": "_0",
                "leaf": false,
                "expanded": true,
                "_0_0": {"label": "_0_0", "leaf": false, "expanded": false}
            }
        })
    );

    let deeper = data(
        &def,
        vec![json!("_0"), json!("_0_0")],
        json!({
            "_0_0_0": {"label": "_0_0_0", "leaf": true, "expanded": false},
            "expanded": true
        }),
    );
    let state = reducer.reduce(Some(&state), &deeper).unwrap().unwrap();
    assert_eq!(
        state.payload.get_in(&["_0", "label"]),
        Some(&Node::from("_0"))
    );
    assert_eq!(
        state.payload.get_in(&["_0", "_0_0", "label"]),
        Some(&Node::from("_0_0"))
    );
    assert_eq!(
        state.payload.get_in(&["_0", "_0_0", "expanded"]),
        Some(&Node::from(true))
    );
    assert!(state.payload.get_in(&["_0", "_0_0", "_0_0_0"]).is_some());
}

// ============================================================================
// ListReducer
// ============================================================================

#[test]
fn test_list_pages_accumulate_with_same_class() {
    let def = Arc::new(ActionDefinition::new("@@App/MESSAGES"));
    let reducer = ListReducer::new(None, [Arc::clone(&def)]);
    let sorting = Sorting::by("timestamp", SortDirection::Desc);

    let first = reducer
        .reduce(None, &page(&def, 0, sorting.clone(), json!(["a", "b"])))
        .unwrap()
        .unwrap();
    assert_eq!(list_of(&first).next_page.number, Some(1));

    let second = reducer
        .reduce(Some(&first), &page(&def, 1, sorting, json!(["c", "d"])))
        .unwrap()
        .unwrap();
    let result = list_of(&second);

    assert_eq!(result.page, vec![json!("c"), json!("d")]);
    assert_eq!(
        result.list,
        vec![json!("a"), json!("b"), json!("c"), json!("d")]
    );
    assert_eq!(result.next_page.number, Some(2));
    assert_eq!(result.psf_state.pagination, Pagination::new(1, 2).with_total(6));
}

#[test]
fn test_list_sorting_change_clears_cache() {
    let def = Arc::new(ActionDefinition::new("@@App/MESSAGES"));
    let reducer = ListReducer::new(None, [Arc::clone(&def)]);
    let desc = Sorting::by("timestamp", SortDirection::Desc);
    let asc = Sorting::by("timestamp", SortDirection::Asc);

    let first = reducer
        .reduce(None, &page(&def, 0, desc.clone(), json!(["a", "b"])))
        .unwrap()
        .unwrap();
    let second = reducer
        .reduce(Some(&first), &page(&def, 1, desc, json!(["c", "d"])))
        .unwrap()
        .unwrap();
    let resorted = reducer
        .reduce(Some(&second), &page(&def, 2, asc.clone(), json!(["z", "y"])))
        .unwrap()
        .unwrap();
    let result = list_of(&resorted);

    assert_eq!(result.list, vec![json!("z"), json!("y")]);
    assert_eq!(result.pages.keys().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(result.next_page.number, Some(0));
    assert_eq!(result.psf_state.sorting, asc);
}

#[rstest]
#[case::size(Pagination::new(1, 3).with_total(6), None)]
#[case::filter(
    Pagination::new(1, 2).with_total(6),
    Some(vec![FilterCriterion::new("message", "contains", json!("hi"))])
)]
fn test_list_class_change_clears_cache(
    #[case] pagination: Pagination,
    #[case] filter: Option<Vec<FilterCriterion>>,
) {
    let def = Arc::new(ActionDefinition::new("@@App/MESSAGES"));
    let reducer = ListReducer::new(None, [Arc::clone(&def)]);
    let sorting = Sorting::by("timestamp", SortDirection::Desc);

    let first = reducer
        .reduce(None, &page(&def, 0, sorting.clone(), json!(["a", "b"])))
        .unwrap()
        .unwrap();

    let mut next = page(&def, 1, sorting, json!(["c", "d"]));
    next.pagination = pagination;
    if let Some(filter) = filter {
        next.filter = Some(filter);
    }
    let reduced = reducer.reduce(Some(&first), &next).unwrap().unwrap();

    assert_eq!(list_of(&reduced).list, vec![json!("c"), json!("d")]);
}

#[test]
fn test_list_page_without_total_keeps_cache() {
    let def = Arc::new(ActionDefinition::new("@@App/MESSAGES"));
    let reducer = ListReducer::new(None, [Arc::clone(&def)]);
    let sorting = Sorting::by("timestamp", SortDirection::Desc);

    let first = reducer
        .reduce(None, &page(&def, 0, sorting.clone(), json!(["a", "b"])))
        .unwrap()
        .unwrap();
    let mut next = page(&def, 1, sorting, json!(["c", "d"]));
    next.pagination = Pagination::new(1, 2);
    let result = list_of(&reducer.reduce(Some(&first), &next).unwrap().unwrap());

    assert_eq!(
        result.list,
        vec![json!("a"), json!("b"), json!("c"), json!("d")]
    );
    assert_eq!(result.psf_state.pagination, Pagination::new(1, 2).with_total(6));
    assert_eq!(result.next_page.number, Some(2));
}

#[test]
fn test_list_size_falls_back_to_page_size() {
    let def = Arc::new(ActionDefinition::new("@@App/MESSAGES"));
    let reducer = ListReducer::new(None, [Arc::clone(&def)]).with_page_size(3);

    let action = def.instance(
        InstanceProperties::data()
            .params(vec![])
            .payload(json!(["a", "b", "c"])),
    );
    let first = reducer.reduce(None, &action).unwrap().unwrap();
    assert_eq!(list_of(&first).pagination(), &Pagination::new(0, 3));

    let seeded = reducer.to_list(vec![json!("x")], None, vec![], None);
    assert_eq!(seeded.pagination(), &Pagination::new(0, 3).with_total(1));
}

#[test]
fn test_list_invalid_previous_state_is_an_error() {
    let def = Arc::new(ActionDefinition::new("@@App/MESSAGES"));
    let reducer = ListReducer::new(None, [Arc::clone(&def)]);
    let broken = data(
        &def,
        vec![],
        json!({
            "page": ["a", "b"],
            "list": ["a", "b"],
            "pages": {"0": ["a", "b"]},
            "nextPage": {"number": 1, "timestamp": 0},
            "psfState": {"pagination": {"number": -1, "size": 2}}
        }),
    );

    let err = reducer
        .reduce(Some(&broken), &page(&def, 1, Sorting::default(), json!(["c", "d"])))
        .unwrap_err();
    assert!(matches!(err, ReduceError::Payload(_)));
}

#[test]
fn test_list_all_pages_cached() {
    let def = Arc::new(ActionDefinition::new("@@App/MESSAGES"));
    let reducer = ListReducer::new(None, [Arc::clone(&def)]);
    let mut state = None;
    for number in 0..3 {
        let action = page(&def, number, Sorting::default(), json!([number]));
        state = reducer.reduce(state.as_ref(), &action).unwrap();
    }
    let result = list_of(state.as_ref().unwrap());
    assert_eq!(result.list, vec![json!(0), json!(1), json!(2)]);
    assert_eq!(result.next_page.number, None);
}

// ============================================================================
// split, composed the way a chat view composes it
// ============================================================================

fn chat_reducer(def: &Arc<ActionDefinition>, initial: Option<ActionInstance>) -> impl Reducer {
    accumulate(split(
        [Arc::clone(def)],
        vec![
            Box::new(DefaultReducer::new(initial.clone(), [Arc::clone(def)])) as Box<dyn Reducer>,
            Box::new(ListReducer::new(initial, [Arc::clone(def)])),
        ],
    ))
}

#[test]
fn test_split_arity_match_reduces_each_slot() {
    let def = welcome();
    let reducer = chat_reducer(&def, None);

    let action = def.instance(
        InstanceProperties::data()
            .params(vec![json!("room")])
            .pagination(Pagination::new(0, 2).with_total(3))
            .payload(json!([{"draft": "hi"}, ["m1", "m2"]])),
    );
    let state = reducer.reduce(None, &action).unwrap().unwrap();

    let slots = state.payload.get("room").and_then(Node::as_list).unwrap();
    assert_eq!(slots[0].to_value(), json!({"draft": "hi"}));
    let list = ListResult::from_node(&slots[1]).unwrap().unwrap();
    assert_eq!(list.list, vec![json!("m1"), json!("m2")]);
    assert_eq!(list.next_page.number, Some(1));
}

#[test]
fn test_split_keeps_list_cache_per_branch() {
    let def = welcome();
    let reducer = chat_reducer(&def, None);
    let dispatch = |state: Option<&ActionInstance>, channel: &str, number: u64, items: Value| {
        let action = def.instance(
            InstanceProperties::data()
                .params(vec![json!(channel)])
                .pagination(Pagination::new(number, 2).with_total(4))
                .payload(json!([null, items])),
        );
        reducer.reduce(state, &action).unwrap().unwrap()
    };

    let state = dispatch(None, "room", 0, json!(["r1", "r2"]));
    let state = dispatch(Some(&state), "broadcast", 0, json!(["b1"]));
    let state = dispatch(Some(&state), "room", 1, json!(["r3"]));

    let room = state.payload.get("room").and_then(|slots| slots.get_index(1)).unwrap();
    assert_eq!(
        ListResult::from_node(room).unwrap().unwrap().list,
        vec![json!("r1"), json!("r2"), json!("r3")]
    );
    let broadcast = state
        .payload
        .get("broadcast")
        .and_then(|slots| slots.get_index(1))
        .unwrap();
    assert_eq!(ListResult::from_node(broadcast).unwrap().unwrap().list, vec![json!("b1")]);
}

#[test]
fn test_split_arity_mismatch_leaves_state() {
    let def = welcome();
    let reducer = chat_reducer(&def, None);

    let first = def.instance(
        InstanceProperties::data()
            .params(vec![json!("room")])
            .payload(json!([{}, []])),
    );
    let state = reducer.reduce(None, &first).unwrap().unwrap();

    let wrong = def.instance(
        InstanceProperties::data()
            .params(vec![json!("room")])
            .payload(json!([{}, [], {}])),
    );
    assert_eq!(reducer.reduce(Some(&state), &wrong).unwrap(), None);
}

#[test]
fn test_split_initial_state_from_seeded_list() {
    let def = welcome();
    let seeded = ListReducer::default().to_list(
        vec![json!("hello")],
        Some(Pagination::new(0, 5)),
        vec![FilterCriterion::new("message", "contains", json!(""))],
        Some(Sorting::by("timestamp", SortDirection::Desc)),
    );
    let initial = def.instance(
        InstanceProperties::data()
            .params(vec![json!("broadcast")])
            .payload(json!({
                "broadcast": [{}, serde_json::to_value(&seeded).unwrap()]
            })),
    );
    let reducer = chat_reducer(&def, Some(initial.clone()));

    let state = reducer.initial_state().unwrap();
    assert_eq!(state.payload, initial.payload);
    let slot = state
        .payload
        .get("broadcast")
        .and_then(|slots| slots.get_index(1))
        .unwrap();
    assert_eq!(ListResult::from_node(slot).unwrap().unwrap().psf_state.pagination.total_elements, Some(1));
}

#[test]
fn test_error_log_in_chain_falls_through() {
    let def = channel();
    let reducer = Chain::new()
        .with(ErrorLogReducer)
        .with(DefaultReducer::new(None, [Arc::clone(&def)]));

    let failure = def.instance(InstanceProperties::error().params(vec![]).payload(json!("boom")));
    assert_eq!(reducer.reduce(None, &failure).unwrap(), None);

    let ok = data(&def, vec![], json!(1));
    assert_eq!(reducer.reduce(None, &ok).unwrap().map(|s| s.payload), Some(Node::from(json!(1))));
}
