use crate::pagination::Window;

/// Identifies the field a filter applies to. One bit per field so criteria
/// can cheaply track which fields already carry a filter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
    Sixteen = 16,
    ThirtyTwo = 32,
    SixtyFour = 64,
    OneTwentyEight = 128,
}

impl Tag {
    const NONE: u8 = 0;
}

pub trait ListFilter: Sized {
    type Criteria;

    fn tag(&self) -> Tag;

    fn criteria(window: Window) -> Self::Criteria;
}

/// A validated window plus the conjunction of filters a listing runs with.
/// At most one filter per tag is kept; later duplicates are ignored.
#[derive(Debug, PartialEq, Eq)]
pub struct ListCriteria<T> {
    window: Window,
    filters: Vec<T>,
    applied: u8,
}

impl<T> ListCriteria<T> {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            filters: Vec::new(),
            applied: Tag::NONE,
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn filters(&self) -> &[T] {
        &self.filters
    }
}

impl<T> ListCriteria<T>
where
    T: ListFilter,
{
    pub fn add(&mut self, filter: T) -> &mut Self {
        let tag = filter.tag() as u8;

        if tag & self.applied == 0 {
            self.applied |= tag;
            self.filters.push(filter);
        }

        self
    }

    pub fn with(mut self, filter: T) -> Self {
        self.add(filter);
        self
    }
}
