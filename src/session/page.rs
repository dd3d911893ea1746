//! Pages and the per-thread page map.
//!
//! A [`Page`] is an opaque storage unit built by framework code (for example
//! the chunked object list of one element type). The [`PageMap`] keys pages by
//! [`PageTag`] and owns them; the registry never constructs a page itself.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// Downcasting support for [`Page`] trait objects, implemented for every
/// `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Storage unit housed by the page registry.
///
/// `finalize` must be idempotent. The registry calls it once per teardown,
/// right before dropping the page.
pub trait Page: AsAny {
    fn finalize(&mut self);
}

/// Type identifier a page is registered under.
///
/// Equality and hashing use the [`TypeId`] only; the name is kept for logs.
#[derive(Clone, Copy)]
pub struct PageTag {
    id: TypeId,
    name: &'static str,
}

impl PageTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for PageTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PageTag {}

impl Hash for PageTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageTag({})", self.name)
    }
}

/// Owning map from [`PageTag`] to page, plus the tag set used for membership
/// tests. Both always hold the same tags.
#[derive(Default)]
pub struct PageMap {
    pages: FxHashMap<PageTag, Box<dyn Page>>,
    tags: FxHashSet<PageTag>,
}

impl PageMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `page` under its own type, taking ownership.
    ///
    /// A page already registered under that type is finalized and dropped.
    /// Returns `true` if one was replaced. Use [`remove`](Self::remove) first
    /// to take the old page back instead.
    pub fn insert<P: Page>(&mut self, page: P) -> bool {
        self.insert_boxed(PageTag::of::<P>(), Box::new(page))
    }

    /// Registers an already boxed page under an explicit tag, finalizing any
    /// page it replaces.
    pub fn insert_boxed(&mut self, tag: PageTag, page: Box<dyn Page>) -> bool {
        self.tags.insert(tag);
        match self.pages.insert(tag, page) {
            Some(mut replaced) => {
                trace!(page = tag.name(), "finalizing replaced page");
                replaced.finalize();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, tag: &PageTag) -> bool {
        self.tags.contains(tag)
    }

    pub fn contains_type<P: Page>(&self) -> bool {
        self.contains(&PageTag::of::<P>())
    }

    /// Page registered under `P`'s tag, if it is a `P`.
    pub fn get<P: Page>(&self) -> Option<&P> {
        let page = self.pages.get(&PageTag::of::<P>())?;
        (**page).as_any().downcast_ref::<P>()
    }

    pub fn get_mut<P: Page>(&mut self) -> Option<&mut P> {
        let page = self.pages.get_mut(&PageTag::of::<P>())?;
        (**page).as_any_mut().downcast_mut::<P>()
    }

    /// Untyped access by tag.
    pub fn get_tagged(&self, tag: &PageTag) -> Option<&dyn Page> {
        self.pages.get(tag).map(|page| &**page)
    }

    /// Takes `P`'s page back out of the map without finalizing it.
    ///
    /// A page registered under `P`'s tag but of another type stays in place.
    pub fn remove<P: Page>(&mut self) -> Option<Box<P>> {
        let tag = PageTag::of::<P>();
        if !self.get_tagged(&tag)?.as_any().is::<P>() {
            return None;
        }
        self.tags.remove(&tag);
        let page = self.pages.remove(&tag)?;
        page.into_any().downcast::<P>().ok()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &PageTag> {
        self.pages.keys()
    }

    /// Finalizes and drops every page, leaving the map empty.
    pub(crate) fn finalize_all(&mut self) -> usize {
        let count = self.pages.len();
        for (tag, mut page) in self.pages.drain() {
            trace!(page = tag.name(), "finalizing page");
            page.finalize();
        }
        self.tags.clear();
        count
    }
}

impl fmt::Debug for PageMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.pages.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Rows {
        data: Vec<u64>,
        finalized: bool,
    }

    impl Page for Rows {
        fn finalize(&mut self) {
            self.data.clear();
            self.finalized = true;
        }
    }

    #[derive(Debug, Default)]
    struct Edges(Vec<(u32, u32)>);

    impl Page for Edges {
        fn finalize(&mut self) {
            self.0.clear();
        }
    }

    #[test]
    fn insert_and_get_by_type() {
        let mut map = PageMap::new();
        assert!(!map.insert(Rows { data: vec![1, 2], finalized: false }));
        map.insert(Edges(vec![(0, 1)]));

        assert_eq!(map.len(), 2);
        assert!(map.contains_type::<Rows>());
        assert_eq!(map.get::<Rows>().map(|r| r.data.len()), Some(2));
        assert_eq!(map.get::<Edges>().map(|e| e.0.len()), Some(1));
    }

    #[test]
    fn get_mut_allows_in_place_growth() {
        let mut map = PageMap::new();
        map.insert(Rows::default());
        if let Some(rows) = map.get_mut::<Rows>() {
            rows.data.extend([7, 8, 9]);
        }
        assert_eq!(map.get::<Rows>().unwrap().data, vec![7, 8, 9]);
    }

    struct Counted(Rc<Cell<u32>>);

    impl Page for Counted {
        fn finalize(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn re_insert_finalizes_replaced_page() {
        let finalized = Rc::new(Cell::new(0));
        let mut map = PageMap::new();
        assert!(!map.insert(Counted(Rc::clone(&finalized))));
        assert!(map.insert(Counted(Rc::clone(&finalized))));
        assert_eq!(finalized.get(), 1);
        assert_eq!(map.len(), 1);

        assert_eq!(map.finalize_all(), 1);
        assert_eq!(finalized.get(), 2);
    }

    #[test]
    fn remove_before_insert_keeps_old_page_unfinalized() {
        let mut map = PageMap::new();
        map.insert(Rows { data: vec![1], finalized: false });
        let old = map.remove::<Rows>().unwrap();
        assert!(!map.insert(Rows { data: vec![2], finalized: false }));
        assert_eq!(old.data, vec![1]);
        assert!(!old.finalized);
        assert_eq!(map.get::<Rows>().map(|r| r.data.clone()), Some(vec![2]));
    }

    #[test]
    fn remove_hands_back_ownership() {
        let mut map = PageMap::new();
        map.insert(Rows { data: vec![5], finalized: false });
        let rows = map.remove::<Rows>().unwrap();
        assert_eq!(rows.data, vec![5]);
        assert!(!map.contains_type::<Rows>());
        assert!(map.is_empty());
        assert!(map.remove::<Rows>().is_none());
    }

    #[test]
    fn foreign_tag_does_not_downcast() {
        let mut map = PageMap::new();
        map.insert_boxed(PageTag::of::<Rows>(), Box::new(Edges::default()));
        assert!(map.contains(&PageTag::of::<Rows>()));
        assert!(map.get::<Rows>().is_none());
        assert!(map.remove::<Rows>().is_none());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn finalize_all_empties_map_and_set() {
        let mut map = PageMap::new();
        map.insert(Rows::default());
        map.insert(Edges::default());
        assert_eq!(map.finalize_all(), 2);
        assert!(map.is_empty());
        assert!(!map.contains_type::<Rows>());
        assert_eq!(map.finalize_all(), 0);
    }

    #[test]
    fn tags_compare_by_type_only() {
        assert_eq!(PageTag::of::<Rows>(), PageTag::of::<Rows>());
        assert_ne!(PageTag::of::<Rows>(), PageTag::of::<Edges>());
        assert!(PageTag::of::<Rows>().name().ends_with("Rows"));
        assert!(format!("{:?}", PageTag::of::<Edges>()).contains("Edges"));
    }
}
