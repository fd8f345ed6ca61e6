use std::ops::{Index, IndexMut};

/// Slot vector with index recycling. Erased slots go on a vacant stack and
/// are handed out again by the next `insert`.
#[derive(Clone, Debug)]
pub(crate) struct List<T> {
    data: Vec<Option<T>>,
    elements: usize,
    vacant: Vec<usize>,
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            elements: 0,
            vacant: Vec::new(),
        }
    }

    /// Number of occupied slots.
    pub fn size(&self) -> usize {
        self.elements
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)?.as_mut()
    }

    pub fn insert(&mut self, element: T) -> usize {
        self.elements += 1;
        if let Some(index) = self.vacant.pop() {
            debug_assert!(self.data[index].is_none());
            self.data[index] = Some(element);
            return index;
        }
        self.data.push(Some(element));
        self.data.len() - 1
    }

    pub fn erase(&mut self, index: usize) -> Option<T> {
        let element = self.data.get_mut(index)?.take()?;
        self.elements -= 1;
        self.vacant.push(index);
        Some(element)
    }
}

impl<T> Index<usize> for List<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(element) => element,
            None => panic!("list slot {} is vacant", index),
        }
    }
}

impl<T> IndexMut<usize> for List<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Some(element) => element,
            None => panic!("list slot {} is vacant", index),
        }
    }
}
