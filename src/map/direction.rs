use hexx::Hex;

/// One of the six edges of a pointy-top hex.
///
/// The declaration order is the enumeration order used everywhere a tile's
/// neighbors are walked, which makes breadth-first searches deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

/// Axial offsets, indexed by `Direction as usize`
const OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Direction pointing back across the same edge
    pub const fn reverse(self) -> Self {
        Self::ALL[(self as usize + 3) % 6]
    }

    /// Axial vector one step in this direction
    pub fn offset(self) -> Hex {
        let (x, y) = OFFSETS[self.index()];
        Hex::new(x, y)
    }

    /// Direction whose unit offset equals `delta`, if any
    pub fn from_offset(delta: Hex) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| dir.offset() == delta)
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Bitset over the six directions.
///
/// Used both for committed road flow ("an edge leaves this tile towards D") and for
/// directions staged by the build tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirectionMask(u8);

impl DirectionMask {
    pub const EMPTY: DirectionMask = DirectionMask(0);
    pub const ALL: DirectionMask = DirectionMask(0b0011_1111);

    pub fn single(direction: Direction) -> Self {
        DirectionMask(direction.bit())
    }

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    pub fn with(mut self, direction: Direction) -> Self {
        self.insert(direction);
        self
    }

    pub fn union(self, other: DirectionMask) -> Self {
        DirectionMask(self.0 | other.0)
    }

    pub fn intersection(self, other: DirectionMask) -> Self {
        DirectionMask(self.0 & other.0)
    }

    pub fn difference(self, other: DirectionMask) -> Self {
        DirectionMask(self.0 & !other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Set directions in enumeration order
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |dir| self.contains(*dir))
    }

    /// Raw encoding, only meant for the persistence layer
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Decode a persisted mask; bits outside the six directions are rejected
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits & !Self::ALL.0 == 0).then_some(DirectionMask(bits))
    }
}

impl FromIterator<Direction> for DirectionMask {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter().fold(DirectionMask::EMPTY, DirectionMask::with)
    }
}
