use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use anyhow::{Context, Result};

use super::{FetchResponse, ObjectStream, ReachabilityWalk, Transport};
use crate::auth::AuthMethod;
use crate::hash::Hash;
use crate::object::RawObject;
use crate::storage::{MemoryStore, ObjectStore};

/// Resource opened by one fetch from a [`MemoryTransport`].
///
/// Clones share state, so a test can keep a handle and check that the fetch
/// released it.
#[derive(Debug, Clone)]
pub struct FetchHandle {
    id: usize,
    released: Rc<Cell<bool>>,
}

impl FetchHandle {
    fn new(id: usize) -> Self {
        Self {
            id,
            released: Rc::new(Cell::new(false)),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_released(&self) -> bool {
        self.released.get()
    }

    /// Release the handle. Fails if it was already released.
    pub fn release(&self) -> Result<()> {
        if self.released.replace(true) {
            anyhow::bail!("Fetch handle {} already released", self.id);
        }
        Ok(())
    }
}

#[derive(Default)]
struct RemoteState {
    refs: BTreeMap<String, Hash>,
    objects: Rc<MemoryStore>,
    handles: Vec<FetchHandle>,
    fail_after: Option<usize>,
    fail_close: bool,
}

/// Deterministic in-memory remote.
///
/// Serves a fixed set of objects and refs, records every handle it opens,
/// and can inject failures into streams. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Rc<RefCell<RemoteState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the remote and return its hash.
    pub fn insert_object(&self, object: RawObject) -> Hash {
        let hash = object.hash();
        let mut state = self.state.borrow_mut();
        Rc::make_mut(&mut state.objects).insert(object);
        hash
    }

    pub fn set_ref(&self, name: impl Into<String>, target: Hash) {
        self.state.borrow_mut().refs.insert(name.into(), target);
    }

    /// Make every later stream fail after delivering `count` objects.
    pub fn fail_after(&self, count: usize) {
        self.state.borrow_mut().fail_after = Some(count);
    }

    /// Make every later stream report an error when closed. The handle is
    /// still released.
    pub fn fail_close(&self, fail: bool) {
        self.state.borrow_mut().fail_close = fail;
    }

    pub fn fetch_count(&self) -> usize {
        self.state.borrow().handles.len()
    }

    pub fn open_handles(&self) -> usize {
        self.state
            .borrow()
            .handles
            .iter()
            .filter(|handle| !handle.is_released())
            .count()
    }

    pub fn last_handle(&self) -> Option<FetchHandle> {
        self.state.borrow().handles.last().cloned()
    }

    pub fn object_count(&self) -> usize {
        self.state.borrow().objects.len()
    }
}

impl Transport for MemoryTransport {
    fn fetch(&mut self, reference: &str, auth: Option<&dyn AuthMethod>) -> Result<FetchResponse> {
        let mut state = self.state.borrow_mut();
        let head = *state
            .refs
            .get(reference)
            .with_context(|| format!("Reference {} not found on remote", reference))?;

        let handle = FetchHandle::new(state.handles.len());
        state.handles.push(handle.clone());
        tracing::debug!(
            "Opened fetch handle {} for {} -> {} (auth: {})",
            handle.id(),
            reference,
            head,
            auth.map(|a| a.name()).unwrap_or("none")
        );

        let stream = MemoryStream {
            objects: Rc::clone(&state.objects),
            walk: ReachabilityWalk::new(head),
            handle,
            delivered: 0,
            fail_after: state.fail_after,
            fail_close: state.fail_close,
        };

        Ok(FetchResponse {
            head,
            stream: Box::new(stream),
        })
    }
}

struct MemoryStream {
    objects: Rc<MemoryStore>,
    walk: ReachabilityWalk,
    handle: FetchHandle,
    delivered: usize,
    fail_after: Option<usize>,
    fail_close: bool,
}

impl Iterator for MemoryStream {
    type Item = Result<RawObject>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.handle.is_released() {
            return None;
        }
        if self.fail_after == Some(self.delivered) {
            self.walk.clear();
            self.fail_after = None;
            return Some(Err(anyhow::anyhow!(
                "Stream interrupted after {} objects",
                self.delivered
            )));
        }

        let objects = &self.objects;
        let item = self.walk.next_with(|hash| {
            objects
                .get(hash)
                .cloned()
                .with_context(|| format!("Remote is missing object {}", hash))
        })?;
        self.delivered += 1;
        Some(item)
    }
}

impl ObjectStream for MemoryStream {
    fn close(&mut self) -> Result<()> {
        self.handle.release()?;
        if self.fail_close {
            anyhow::bail!("Injected close failure for handle {}", self.handle.id());
        }
        Ok(())
    }
}
