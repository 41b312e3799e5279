//! Paginated list reduction
//!
//! [`ListReducer`] keeps a page cache per list. The cache is keyed by page
//! number and belongs to one `(page size, sorting, filter)` combination:
//! whenever a DATA action arrives with a different combination the cache is
//! dropped before the new page is stored.
//!
//! The payload of a DATA action is one of
//!
//! - an array of items (the page),
//! - a previously built [`ListResult`] (its `page` is used),
//! - an object with a single key wrapping either of the above. The key is the
//!   *collect key*, and the result is wrapped under it again.

pub mod result;

use std::sync::Arc;

use serde_json::Value;
use silverghost_actions::{
    ActionDefinition, ActionInstance, FilterCriterion, Node, Pagination, Sorting,
};

use crate::default::data_definition;
use crate::error::{ReduceError, Result};
use crate::graph::equal_graphs;
use crate::reducer::Reducer;
pub use result::{ListResult, NextPage, PsfState};

/// Page size used when neither the action nor the reducer names one
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone)]
pub struct ListReducer {
    initial: Option<ActionInstance>,
    definitions: Vec<Arc<ActionDefinition>>,
    page_size: u64,
}

impl Default for ListReducer {
    fn default() -> Self {
        ListReducer::new(None, [])
    }
}

impl ListReducer {
    pub fn new<I>(initial: Option<ActionInstance>, definitions: I) -> Self
    where
        I: IntoIterator<Item = Arc<ActionDefinition>>,
    {
        ListReducer {
            initial,
            definitions: definitions.into_iter().collect(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size assumed when a DATA action carries none, and for seeded
    /// lists without pagination
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Builds a list snapshot for seeding initial state.
    ///
    /// Pagination defaults to the first page of the reducer's page size; its
    /// total is always the number of items given.
    ///
    /// ```
    /// use serde_json::json;
    /// use silverghost_reducers::ListReducer;
    ///
    /// let reducer = ListReducer::default().with_page_size(25);
    /// let seeded = reducer.to_list(vec![json!("a"), json!("b")], None, vec![], None);
    /// assert_eq!(seeded.list, vec![json!("a"), json!("b")]);
    /// assert_eq!(seeded.pagination().size, Some(25));
    /// assert_eq!(seeded.pagination().total_elements, Some(2));
    /// assert_eq!(seeded.next_page.number, None);
    /// ```
    pub fn to_list(
        &self,
        items: Vec<Value>,
        pagination: Option<Pagination>,
        filter: Vec<FilterCriterion>,
        sorting: Option<Sorting>,
    ) -> ListResult {
        let pagination = pagination
            .unwrap_or_else(|| Pagination::new(0, self.page_size))
            .with_total(items.len() as u64);
        ListResult {
            page: items.clone(),
            list: items,
            pages: Default::default(),
            next_page: NextPage::now(None),
            psf_state: PsfState {
                pagination,
                filter,
                sorting: sorting.unwrap_or_default(),
            },
            export_data: None,
        }
    }

    fn reduction(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
        definition: &Arc<ActionDefinition>,
    ) -> Result<ActionInstance> {
        let (collect_key, raw) = unwrap_collect_key(&action.payload);
        let incoming_psf = ListResult::from_node(raw)?.map(|result| result.psf_state);
        let incoming = page_items(raw).ok_or_else(|| ReduceError::MalformedPayload {
            action: action.action_type.clone(),
        })?;

        let previous = match state {
            Some(state) => match collect_key {
                Some(key) => state.payload.get(key).map(ListResult::from_node).transpose()?.flatten(),
                None => ListResult::from_node(&state.payload)?,
            },
            None => None,
        };

        let mut pagination = if action.pagination.is_complete() {
            action.pagination.clone()
        } else {
            let carried = incoming_psf
                .as_ref()
                .map(|psf| psf.pagination.clone())
                .filter(Pagination::is_complete)
                .unwrap_or_default();
            Pagination {
                number: action.pagination.number.or(carried.number),
                size: action.pagination.size.or(carried.size).or(Some(self.page_size)),
                total_elements: action.pagination.total_elements.or(carried.total_elements),
            }
        };
        let sorting = action
            .sorting
            .clone()
            .or_else(|| incoming_psf.as_ref().map(|psf| psf.sorting.clone()))
            .unwrap_or_default();
        let filter = action
            .filter
            .clone()
            .or_else(|| incoming_psf.as_ref().map(|psf| psf.filter.clone()))
            .unwrap_or_default();

        let result = if action.is_export() {
            export_slice(previous, &pagination, incoming)
        } else {
            let reusable = match &previous {
                Some(previous) => same_class(&previous.psf_state, &pagination, &sorting, &filter)?,
                None => false,
            };
            let mut pages = match previous {
                Some(previous) if reusable => {
                    // a page without a total keeps the total of the pages before it
                    if pagination.total_elements.is_none() {
                        pagination.total_elements = previous.pagination().total_elements;
                    }
                    previous.pages
                }
                _ => Default::default(),
            };

            let number = pagination.number.unwrap_or(0);
            pagination.number = Some(number);
            pages.insert(number, incoming.clone());

            let list = pages.values().flatten().cloned().collect();
            let next_number = pagination
                .page_count()
                .and_then(|count| (0..count).find(|page| !pages.contains_key(page)));

            ListResult {
                page: incoming,
                list,
                pages,
                next_page: NextPage::now(next_number),
                psf_state: PsfState {
                    pagination: pagination.clone(),
                    filter: filter.clone(),
                    sorting: sorting.clone(),
                },
                export_data: None,
            }
        };

        let mut payload = result.to_node()?;
        if let Some(key) = collect_key {
            let mut wrapper = Node::map();
            wrapper.insert(key, payload);
            payload = wrapper;
        }

        Ok(ActionInstance {
            pagination,
            sorting: Some(sorting),
            filter: Some(filter),
            payload,
            definition: Some(Arc::clone(definition)),
            ..action.clone()
        })
    }
}

impl Reducer for ListReducer {
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        match data_definition(&self.definitions, action) {
            Some(definition) => self.reduction(state, action, definition).map(Some),
            None => Ok(None),
        }
    }

    fn initial_state(&self) -> Option<ActionInstance> {
        self.initial.clone()
    }
}

/// Splits a single-key object into its key and value
fn unwrap_collect_key(payload: &Node) -> (Option<&str>, &Node) {
    match payload.as_map() {
        Some(map) if map.len() == 1 => {
            match map.iter().next() {
                Some((key, value)) => (Some(key.as_str()), value),
                None => (None, payload),
            }
        }
        _ => (None, payload),
    }
}

/// Items of an array payload, or the `page` of a list result
fn page_items(node: &Node) -> Option<Vec<Value>> {
    let items = if ListResult::is_list_result(node) {
        node.get("page")?
    } else {
        node
    };
    items
        .as_list()
        .map(|items| items.iter().map(Node::to_value).collect())
}

/// Whether a reduction with this pagination, sorting and filter may reuse
/// the pages cached under `previous`
fn same_class(
    previous: &PsfState,
    pagination: &Pagination,
    sorting: &Sorting,
    filter: &[FilterCriterion],
) -> Result<bool> {
    Ok(previous.pagination.size == pagination.size
        && equal_graphs(
            &Node::from_serialize(&previous.sorting)?,
            &Node::from_serialize(sorting)?,
        )
        && equal_graphs(
            &Node::from_serialize(&previous.filter)?,
            &Node::from_serialize(filter)?,
        ))
}

/// Export request: the current page is cut out of the full payload, which
/// is kept alongside. The page cache is left as it was.
fn export_slice(
    previous: Option<ListResult>,
    pagination: &Pagination,
    all: Vec<Value>,
) -> ListResult {
    let current = previous
        .as_ref()
        .map(|previous| previous.pagination().clone())
        .unwrap_or_else(|| pagination.clone());
    let size = current.size.unwrap_or(all.len() as u64) as usize;
    let from = (current.number.unwrap_or(0) as usize)
        .saturating_mul(size)
        .min(all.len());
    let to = from.saturating_add(size).min(all.len());
    let sliced = all[from..to].to_vec();

    match previous {
        Some(previous) => ListResult {
            page: sliced.clone(),
            list: sliced,
            export_data: Some(all),
            ..previous
        },
        None => ListResult {
            page: sliced.clone(),
            list: sliced,
            pages: Default::default(),
            next_page: NextPage::now(None),
            psf_state: PsfState {
                pagination: current,
                ..Default::default()
            },
            export_data: Some(all),
        },
    }
}
