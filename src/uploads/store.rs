use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Identifier of an uploaded image. Combines the store's sequence number with
/// a random nonce so ids stay distinct across stores and sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId {
    seq: u64,
    nonce: u32,
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}-{:08x}", self.seq, self.nonce)
    }
}

fn random_nonce() -> u32 {
    let mut buf = [0u8; 4];
    if let Err(e) = getrandom::getrandom(&mut buf) {
        // The sequence number alone still keeps ids unique within a store.
        log::warn!("no randomness for upload id: {}", e);
    }
    u32::from_le_bytes(buf)
}

/// A decoded file waiting to be added to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUpload {
    pub name: String,
    pub url: String,
}

impl NewUpload {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// An uploaded image. Never mutated once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub id: UploadId,
    pub name: String,
    /// Base64 data URI of the image.
    pub url: String,
}

/// Handle returned by [`UploadStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "dropping the handle leaves no way to unsubscribe"]
pub struct Subscription(u64);

pub type UploadListener = Rc<dyn Fn(&[UploadRecord])>;

/// Listener calls owed after a mutation. Holds its own copy of the listener
/// list and the snapshot, so it can be delivered after the store is released.
#[must_use]
struct Notification {
    listeners: Vec<UploadListener>,
    snapshot: Vec<UploadRecord>,
}

impl Notification {
    fn deliver(self) {
        for listener in &self.listeners {
            listener(&self.snapshot);
        }
    }
}

/// Ordered, in-memory collection of uploads for the editing session.
///
/// Every mutation calls each registered listener once, synchronously, with
/// the full post-mutation snapshot. When the store is shared through a
/// `RefCell`, mutate it with [`UploadStore::add_shared`] and
/// [`UploadStore::remove_shared`]: they release the borrow before listeners
/// run, so a listener may read the store.
pub struct UploadStore {
    records: Vec<UploadRecord>,
    listeners: Vec<(Subscription, UploadListener)>,
    next_seq: u64,
    next_subscription: u64,
}

impl Default for UploadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            listeners: Vec::new(),
            next_seq: 1,
            next_subscription: 1,
        }
    }

    /// Append an upload and return its new id. An upload without image data
    /// is dropped silently and nobody is notified.
    pub fn add(&mut self, upload: NewUpload) -> Option<UploadId> {
        let (id, notification) = self.insert(upload)?;
        notification.deliver();
        Some(id)
    }

    /// Remove the upload with `id`. Unknown ids leave the collection as is but
    /// listeners are still notified.
    pub fn remove(&mut self, id: UploadId) -> Option<UploadRecord> {
        let (removed, notification) = self.take(id);
        notification.deliver();
        removed
    }

    /// [`UploadStore::add`] on a shared store. Listeners run after the borrow
    /// is released.
    pub fn add_shared(store: &RefCell<Self>, upload: NewUpload) -> Option<UploadId> {
        let (id, notification) = store.borrow_mut().insert(upload)?;
        notification.deliver();
        Some(id)
    }

    /// [`UploadStore::remove`] on a shared store. Listeners run after the
    /// borrow is released.
    pub fn remove_shared(store: &RefCell<Self>, id: UploadId) -> Option<UploadRecord> {
        let (removed, notification) = store.borrow_mut().take(id);
        notification.deliver();
        removed
    }

    fn insert(&mut self, upload: NewUpload) -> Option<(UploadId, Notification)> {
        if upload.url.is_empty() {
            return None;
        }

        let id = UploadId {
            seq: self.next_seq,
            nonce: random_nonce(),
        };
        self.next_seq += 1;
        self.records.push(UploadRecord {
            id,
            name: upload.name,
            url: upload.url,
        });
        log::debug!("added {} ({} uploads)", id, self.records.len());
        Some((id, self.notification()))
    }

    fn take(&mut self, id: UploadId) -> (Option<UploadRecord>, Notification) {
        let removed = self
            .records
            .iter()
            .position(|r| r.id == id)
            .map(|pos| self.records.remove(pos));
        (removed, self.notification())
    }

    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: Fn(&[UploadRecord]) + 'static,
    {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((subscription, Rc::new(listener)));
        subscription
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.listeners.retain(|(s, _)| *s != subscription);
    }

    /// Current snapshot, in insertion order.
    pub fn list(&self) -> &[UploadRecord] {
        &self.records
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn notification(&self) -> Notification {
        Notification {
            listeners: self.listeners.iter().map(|(_, l)| l.clone()).collect(),
            snapshot: self.records.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn upload(name: &str) -> NewUpload {
        NewUpload::new(name, format!("data:image/png;base64,{}", name))
    }

    fn names(records: &[UploadRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    fn recorder(store: &mut UploadStore) -> (Subscription, Rc<RefCell<Vec<Vec<String>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = store.subscribe(move |records| sink.borrow_mut().push(names(records)));
        (sub, seen)
    }

    #[test]
    fn test_new_store() {
        let store = UploadStore::new();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_add_remove_sequence_preserves_order() {
        let mut store = UploadStore::new();
        let a = store.add(upload("a")).unwrap();
        let b = store.add(upload("b")).unwrap();
        store.add(upload("c")).unwrap();
        store.remove(b);
        store.add(upload("d")).unwrap();
        store.remove(a);

        assert_eq!(names(store.list()), vec!["c", "d"]);
    }

    #[test]
    fn test_ids_are_unique_and_not_reused() {
        let mut store = UploadStore::new();
        let a = store.add(upload("a")).unwrap();
        store.remove(a);
        let b = store.add(upload("a")).unwrap();

        assert_ne!(a, b);
        assert!(store.get(a).is_none());
        assert_eq!(store.get(b).unwrap().name, "a");
        assert!(a.to_string().starts_with("upload-1-"));
        assert!(b.to_string().starts_with("upload-2-"));
    }

    #[test]
    fn test_add_without_data_is_ignored() {
        let mut store = UploadStore::new();
        let (_sub, seen) = recorder(&mut store);

        assert!(store.add(NewUpload::new("empty.png", "")).is_none());
        assert!(store.is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_each_mutation_notifies_once_with_snapshot() {
        let mut store = UploadStore::new();
        let (_sub, seen) = recorder(&mut store);

        let a = store.add(upload("a")).unwrap();
        store.add(upload("b")).unwrap();
        store.remove(a);

        assert_eq!(
            *seen.borrow(),
            vec![vec!["a".to_string()], vec!["a".into(), "b".into()], vec!["b".into()]]
        );
    }

    #[test]
    fn test_remove_unknown_id_sends_identical_snapshot() {
        let mut store = UploadStore::new();
        let a = store.add(upload("a")).unwrap();
        let mut other = UploadStore::new();
        other.add(upload("x")).unwrap();
        let foreign = other.add(upload("y")).unwrap();

        let (_sub, seen) = recorder(&mut store);
        assert!(store.remove(foreign).is_none());
        assert_eq!(store.get(a).map(|r| r.name.as_str()), Some("a"));
        assert_eq!(*seen.borrow(), vec![vec!["a".to_string()]]);
    }

    #[test]
    fn test_no_replay_on_subscribe() {
        let mut store = UploadStore::new();
        store.add(upload("a")).unwrap();
        let (_sub, seen) = recorder(&mut store);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe_only_affects_that_listener() {
        let mut store = UploadStore::new();
        let (first, first_seen) = recorder(&mut store);
        let (_second, second_seen) = recorder(&mut store);

        store.add(upload("a")).unwrap();
        store.unsubscribe(first);
        store.add(upload("b")).unwrap();

        assert_eq!(first_seen.borrow().len(), 1);
        assert_eq!(second_seen.borrow().len(), 2);
    }

    #[test]
    fn test_shared_store_is_readable_from_listener() {
        let store = Rc::new(RefCell::new(UploadStore::new()));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let reader = Rc::downgrade(&store);
        let sink = seen.clone();
        let _sub = store.borrow_mut().subscribe(move |records| {
            let Some(store) = reader.upgrade() else { return };
            let store = store.borrow();
            assert_eq!(store.list(), records);
            sink.borrow_mut().push(store.len());
        });

        let a = UploadStore::add_shared(&store, upload("a")).unwrap();
        UploadStore::add_shared(&store, upload("b")).unwrap();
        assert_eq!(UploadStore::remove_shared(&store, a).unwrap().name, "a");

        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_notification() {
        let store = Rc::new(RefCell::new(UploadStore::new()));
        let calls = Rc::new(RefCell::new(0));

        let handle = Rc::new(RefCell::new(None));
        let (weak, own, count) = (Rc::downgrade(&store), handle.clone(), calls.clone());
        let sub = store.borrow_mut().subscribe(move |_| {
            *count.borrow_mut() += 1;
            if let (Some(store), Some(sub)) = (weak.upgrade(), own.borrow_mut().take()) {
                store.borrow_mut().unsubscribe(sub);
            }
        });
        *handle.borrow_mut() = Some(sub);

        UploadStore::add_shared(&store, upload("a")).unwrap();
        UploadStore::add_shared(&store, upload("b")).unwrap();

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(store.borrow().len(), 2);
    }
}
