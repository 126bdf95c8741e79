use crate::drawing::{distance, DrawingElement, Point};

/// Ordered board contents. Append order is paint order and undo order.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<DrawingElement>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, element: DrawingElement) {
        self.elements.push(element);
    }

    pub fn remove_last(&mut self) -> Option<DrawingElement> {
        self.elements.pop()
    }

    /// Replaces the element at `index`, returning the previous one. Out of
    /// range indices leave the store untouched.
    pub fn replace_at(&mut self, index: usize, element: DrawingElement) -> Option<DrawingElement> {
        let slot = self.elements.get_mut(index)?;
        Some(std::mem::replace(slot, element))
    }

    pub fn remove_at(&mut self, index: usize) -> Option<DrawingElement> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    /// Index of the most recently appended element whose anchor lies within
    /// `radius` of `point`.
    pub fn find_near(&self, point: Point, radius: f32) -> Option<usize> {
        self.elements
            .iter()
            .rposition(|element| distance(element.anchor(), point) <= radius)
    }

    pub fn remove_near(&mut self, point: Point, radius: f32) -> Option<DrawingElement> {
        let index = self.find_near(point, radius)?;
        self.remove_at(index)
    }

    /// Like `find_near`, but each element uses its own rendered hit radius.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.elements
            .iter()
            .rposition(|element| distance(element.anchor(), point) <= element.hit_radius())
    }

    pub fn all(&self) -> &[DrawingElement] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&DrawingElement> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut DrawingElement> {
        self.elements.get_mut(index)
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&DrawingElement) -> bool,
    {
        self.elements.retain(keep);
    }

    pub fn extend<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = DrawingElement>,
    {
        self.elements.extend(elements);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::TeamSide;

    const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

    fn ball(x: f32, y: f32) -> DrawingElement {
        DrawingElement::Ball { position: [x, y] }
    }

    #[test]
    fn test_all_returns_append_order() {
        let mut store = ElementStore::new();
        store.append(ball(1.0, 1.0));
        store.append(DrawingElement::player(TeamSide::Home, [2.0, 2.0], BLUE));
        store.append(ball(3.0, 3.0));

        let anchors: Vec<_> = store.all().iter().map(|e| e.anchor()).collect();
        assert_eq!(anchors, vec![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]);
    }

    #[test]
    fn test_remove_last_removes_newest_and_is_noop_when_empty() {
        let mut store = ElementStore::new();
        assert!(store.remove_last().is_none());

        store.append(ball(1.0, 1.0));
        store.append(ball(2.0, 2.0));
        assert_eq!(store.remove_last(), Some(ball(2.0, 2.0)));
        assert_eq!(store.all(), &[ball(1.0, 1.0)]);
        assert_eq!(store.remove_last(), Some(ball(1.0, 1.0)));
        assert!(store.remove_last().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_find_near_prefers_most_recent() {
        let mut store = ElementStore::new();
        store.append(ball(50.0, 50.0));
        store.append(DrawingElement::player(TeamSide::Away, [55.0, 50.0], BLUE));
        store.append(ball(300.0, 300.0));

        assert_eq!(store.find_near([52.0, 50.0], 15.0), Some(1));
        assert_eq!(store.find_near([40.0, 50.0], 10.0), Some(0));
        assert_eq!(store.find_near([150.0, 150.0], 15.0), None);
    }

    #[test]
    fn test_find_near_boundary_is_inclusive() {
        let mut store = ElementStore::new();
        store.append(ball(0.0, 0.0));
        assert_eq!(store.find_near([15.0, 0.0], 15.0), Some(0));
        assert_eq!(store.find_near([15.1, 0.0], 15.0), None);
    }

    #[test]
    fn test_remove_near_only_removes_hit() {
        let mut store = ElementStore::new();
        store.append(ball(10.0, 10.0));
        store.append(ball(100.0, 100.0));

        assert!(store.remove_near([500.0, 500.0], 15.0).is_none());
        assert_eq!(store.remove_near([12.0, 10.0], 15.0), Some(ball(10.0, 10.0)));
        assert_eq!(store.all(), &[ball(100.0, 100.0)]);
    }

    #[test]
    fn test_hit_test_uses_element_radius() {
        let mut store = ElementStore::new();
        store.append(ball(0.0, 0.0));
        store.append(DrawingElement::player(TeamSide::Home, [100.0, 0.0], BLUE));

        assert_eq!(store.hit_test([10.0, 0.0]), None);
        assert_eq!(store.hit_test([7.0, 0.0]), Some(0));
        assert_eq!(store.hit_test([114.0, 0.0]), Some(1));
    }

    #[test]
    fn test_replace_at_out_of_range_is_ignored() {
        let mut store = ElementStore::new();
        store.append(ball(1.0, 1.0));
        assert!(store.replace_at(3, ball(9.0, 9.0)).is_none());
        assert_eq!(store.replace_at(0, ball(2.0, 2.0)), Some(ball(1.0, 1.0)));
        assert_eq!(store.all(), &[ball(2.0, 2.0)]);
    }
}
