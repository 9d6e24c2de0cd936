use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

#[derive(Debug, Default)]
struct TrackerState {
    next_id: u64,
    live: Vec<(u64, &'static str)>,
    released: Vec<&'static str>,
}

/// Records acquisition and release of long-lived resources.
///
/// Every value wrapped with [`track`](Self::track) is logged when acquired and
/// again when its [`Tracked`] handle drops. Release happens through `Drop`
/// alone, so each resource is released exactly once; the recorded order
/// makes teardown order observable.
#[derive(Clone, Default)]
pub struct ResourceTracker {
    state: Rc<RefCell<TrackerState>>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track<T>(&self, name: &'static str, value: T) -> Tracked<T> {
        let id = {
            let mut s = self.state.borrow_mut();
            let id = s.next_id;
            s.next_id += 1;
            s.live.push((id, name));
            id
        };
        log::debug!("acquired {name} (#{id})");
        Tracked { value, name, id, state: Rc::clone(&self.state) }
    }

    /// Number of tracked resources not yet released.
    pub fn live_count(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Names of released resources, oldest release first.
    pub fn release_order(&self) -> Vec<&'static str> {
        self.state.borrow().released.clone()
    }

    /// Logs every resource still alive. Returns how many there were.
    pub fn report_leaks(&self) -> usize {
        let s = self.state.borrow();
        for (id, name) in &s.live {
            log::warn!("resource still alive at shutdown: {name} (#{id})");
        }
        if s.live.is_empty() {
            log::debug!("all {} tracked resources released", s.released.len());
        }
        s.live.len()
    }
}

impl fmt::Debug for ResourceTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("ResourceTracker")
            .field("live", &s.live.len())
            .field("released", &s.released.len())
            .finish()
    }
}

/// A resource registered with a [`ResourceTracker`]. Derefs to the value.
pub struct Tracked<T> {
    value: T,
    name: &'static str,
    id: u64,
    state: Rc<RefCell<TrackerState>>,
}

impl<T> Tracked<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        let mut s = self.state.borrow_mut();
        if let Some(pos) = s.live.iter().position(|&(id, _)| id == self.id) {
            s.live.remove(pos);
        }
        s.released.push(self.name);
        log::debug!("released {} (#{})", self.name, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_releases_in_reverse_declaration_order() {
        let tracker = ResourceTracker::new();
        {
            let _a = tracker.track("device", 1);
            let _b = tracker.track("swap chain", 2);
            let _c = tracker.track("brush", 3);
            assert_eq!(tracker.live_count(), 3);
        }
        assert_eq!(tracker.live_count(), 0);
        assert_eq!(tracker.release_order(), vec!["brush", "swap chain", "device"]);
    }

    #[test]
    fn each_resource_is_released_once() {
        let tracker = ResourceTracker::new();
        let a = tracker.track("a", ());
        let b = tracker.track("b", ());
        drop(a);
        assert_eq!(tracker.live_count(), 1);
        drop(b);
        assert_eq!(tracker.release_order(), vec!["a", "b"]);
        assert_eq!(tracker.report_leaks(), 0);
    }

    #[test]
    fn leaks_are_reported() {
        let tracker = ResourceTracker::new();
        let kept = tracker.track("kept", String::from("x"));
        assert_eq!(tracker.report_leaks(), 1);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn tracked_value_is_mutable_through_deref() {
        let tracker = ResourceTracker::new();
        let mut v = tracker.track("vec", Vec::new());
        v.push(7);
        assert_eq!(*v, vec![7]);
        assert_eq!(v.name(), "vec");
    }
}
