/// One entry of the reaction picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionDescriptor {
    /// Symbolic name of the emoji
    pub name: &'static str,
    /// Glyph shown in the picker and on messages
    pub glyph: &'static str,
    /// Reaction type sent to the backend
    pub kind: &'static str,
}

/// Ordered, immutable set of reactions offered on the channel screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionSet(&'static [ReactionDescriptor]);

impl ReactionSet {
    pub const fn new(reactions: &'static [ReactionDescriptor]) -> Self {
        Self(reactions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ReactionDescriptor> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static ReactionDescriptor> {
        self.0.get(index)
    }

    pub fn by_kind(&self, kind: &str) -> Option<&'static ReactionDescriptor> {
        self.0.iter().find(|r| r.kind == kind)
    }
}

/// Reactions offered by the channel screen's picker, in picker order.
pub const SUPPORTED_REACTIONS: ReactionSet = ReactionSet::new(&[
    ReactionDescriptor {
        name: "thumbsUp",
        glyph: "👍🏽",
        kind: "like",
    },
    ReactionDescriptor {
        name: "duck",
        glyph: "🦆",
        kind: "duck",
    },
    ReactionDescriptor {
        name: "snowboarder",
        glyph: "🏂",
        kind: "snowboarder",
    },
    ReactionDescriptor {
        name: "personBiking",
        glyph: "🚴🏾",
        kind: "personBiking",
    },
]);
