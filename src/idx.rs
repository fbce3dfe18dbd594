use std::borrow::Borrow;
use std::collections::BTreeSet;

pub trait Index: Clone + Copy + Ord + From<usize> + Into<usize> {
}

/// Arena of mesh elements addressed by typed ids. Removed slots leave a hole
/// so ids handed out earlier stay valid for the lifetime of the store.
/// Selected ids are kept apart so walking the selection never visits the
/// rest of the store.
#[derive(Clone, Debug)]
pub struct ElementStore<I: Index, T> {
    slots: Vec<Option<T>>,
    selection: BTreeSet<I>,
    live: usize,
}

impl<I: Index, T> Default for ElementStore<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Index, T> ElementStore<I, T> {
    pub fn new() -> Self {
        Self {
            slots: vec![],
            selection: BTreeSet::new(),
            live: 0,
        }
    }

    pub fn ids(&self) -> ElementIds<'_, I, T> {
        ElementIds {
            store: self,
            index: 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item=(I, &T)> {
        self.ids().map(move |id| (id, &self[id]))
    }

    pub fn contains<K: Borrow<I>>(&self, id: K) -> bool {
        self.get(id).is_some()
    }

    pub fn push(&mut self, value: T) -> I {
        let id = I::from(self.slots.len());
        self.slots.push(Some(value));
        self.live += 1;
        id
    }

    pub fn get<K: Borrow<I>>(&self, id: K) -> Option<&T> {
        let i: usize = (*id.borrow()).into();
        self.slots.get(i)?.as_ref()
    }

    pub fn get_mut<K: Borrow<I>>(&mut self, id: K) -> Option<&mut T> {
        let i: usize = (*id.borrow()).into();
        self.slots.get_mut(i)?.as_mut()
    }

    pub fn remove<K: Borrow<I>>(&mut self, id: K) -> Option<T> {
        let id = *id.borrow();
        let i: usize = id.into();
        let value = self.slots.get_mut(i)?.take()?;
        self.selection.remove(&id);
        self.live -= 1;
        Some(value)
    }

    pub fn count(&self) -> usize {
        self.live
    }

    pub fn is_selected<K: Borrow<I>>(&self, id: K) -> bool {
        self.selection.contains(id.borrow())
    }

    /// Returns false when the id does not name a live element.
    pub fn set_selected<K: Borrow<I>>(&mut self, id: K, selected: bool) -> bool {
        let id = *id.borrow();
        if !self.contains(id) {
            return false;
        }
        if selected {
            self.selection.insert(id);
        } else {
            self.selection.remove(&id);
        }
        true
    }

    /// Selected ids in ascending order.
    pub fn selected(&self) -> impl Iterator<Item=I> + '_ {
        self.selection.iter().copied()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

impl<'a, I: Index, T> IntoIterator for &'a ElementStore<I, T> {
    type Item = I;
    type IntoIter = ElementIds<'a, I, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids()
    }
}

pub struct ElementIds<'a, I: Index, T> {
    store: &'a ElementStore<I, T>,
    index: usize,
}

impl<'a, I: Index, T> Iterator for ElementIds<'a, I, T> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        while self.index < self.store.slots.len() {
            let index = self.index;
            self.index += 1;
            if self.store.slots[index].is_some() {
                return Some(I::from(index));
            }
        }
        None
    }
}

impl<K: Borrow<I>, I: Index, T> std::ops::Index<K> for ElementStore<I, T> {
    type Output = T;

    fn index(&self, id: K) -> &Self::Output {
        match self.get(id) {
            Some(value) => value,
            None => panic!("element id does not name a live element"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
    struct Id(usize);

    impl From<usize> for Id {
        fn from(i: usize) -> Self {
            Id(i)
        }
    }

    impl From<Id> for usize {
        fn from(id: Id) -> Self {
            id.0
        }
    }

    impl Index for Id {}

    #[test]
    fn removed_ids_leave_holes() {
        let mut store: ElementStore<Id, &str> = ElementStore::new();
        let a = store.push("a");
        let b = store.push("b");
        let c = store.push("c");
        assert_eq!(store.remove(b), Some("b"));
        assert_eq!(store.count(), 2);
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![a, c]);
        assert!(!store.contains(b));
        assert_eq!(store.remove(b), None);
    }

    #[test]
    fn selection_flags_follow_elements() {
        let mut store: ElementStore<Id, u8> = ElementStore::new();
        let a = store.push(1);
        let b = store.push(2);
        assert!(store.set_selected(b, true));
        assert_eq!(store.selected().collect::<Vec<_>>(), vec![b]);
        assert!(!store.set_selected(Id(9), true));
        store.clear_selection();
        assert!(!store.is_selected(a));
        assert_eq!(store.selected().count(), 0);
    }

    #[test]
    fn removing_an_element_drops_its_selection() {
        let mut store: ElementStore<Id, u8> = ElementStore::new();
        let a = store.push(1);
        let b = store.push(2);
        store.set_selected(a, true);
        store.set_selected(b, true);
        store.remove(a);
        assert_eq!(store.selected().collect::<Vec<_>>(), vec![b]);
        assert_eq!(store.selected_count(), 1);
    }
}
