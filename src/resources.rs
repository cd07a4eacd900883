use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Resource classes a producer can emit or a consumer can accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceClass {
    // Agriculture
    Grain,
    Fruit,
    Livestock,
    Fish,
    // Natural
    Timber,
    // Minerals
    Coal,
    Iron,
    Ore,
    Oil,
    // Anything manufactured
    Goods,
}

impl ResourceClass {
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Static list of all resource classes for easy iteration.
pub const ALL_CLASSES: &[ResourceClass] = &[
    ResourceClass::Grain,
    ResourceClass::Fruit,
    ResourceClass::Livestock,
    ResourceClass::Fish,
    ResourceClass::Timber,
    ResourceClass::Coal,
    ResourceClass::Iron,
    ResourceClass::Ore,
    ResourceClass::Oil,
    ResourceClass::Goods,
];

/// Set of resource classes attached to a source or destination.
///
/// Two records can exchange resources only when their filters intersect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceFilter(u16);

impl ResourceFilter {
    pub const EMPTY: ResourceFilter = ResourceFilter(0);
    pub const ALL: ResourceFilter = ResourceFilter((1 << ALL_CLASSES.len()) - 1);

    pub fn of(classes: &[ResourceClass]) -> Self {
        classes.iter().copied().collect()
    }

    pub fn contains(self, class: ResourceClass) -> bool {
        self.0 & class.bit() != 0
    }

    pub fn with(self, class: ResourceClass) -> Self {
        ResourceFilter(self.0 | class.bit())
    }

    pub fn union(self, other: ResourceFilter) -> Self {
        ResourceFilter(self.0 | other.0)
    }

    pub fn intersects(self, other: ResourceFilter) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn classes(self) -> impl Iterator<Item = ResourceClass> {
        ALL_CLASSES
            .iter()
            .copied()
            .filter(move |class| self.contains(*class))
    }
}

impl From<ResourceClass> for ResourceFilter {
    fn from(class: ResourceClass) -> Self {
        ResourceFilter(class.bit())
    }
}

impl FromIterator<ResourceClass> for ResourceFilter {
    fn from_iter<I: IntoIterator<Item = ResourceClass>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ResourceFilter::EMPTY, ResourceFilter::with)
    }
}

impl BitOr for ResourceFilter {
    type Output = ResourceFilter;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}
