//! Declaration modifier sets shared by both back ends.

use bitflags::bitflags;

bitflags! {
    /// Modifiers written on a declaration.
    ///
    /// The eager back end treats a declaration without a visibility modifier
    /// as public; the resolved back end treats it as package-private.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const INTERNAL = 1 << 3;
        const ABSTRACT = 1 << 4;
        const OPEN = 1 << 5;
        const FINAL = 1 << 6;
        const OVERRIDE = 1 << 7;
        const STATIC = 1 << 8;
        const TRANSIENT = 1 << 9;
        const DATA = 1 << 10;
    }
}

impl Modifiers {
    pub const VISIBILITY: Modifiers = Modifiers::PUBLIC
        .union(Modifiers::PROTECTED)
        .union(Modifiers::PRIVATE)
        .union(Modifiers::INTERNAL);

    /// Parse a single modifier keyword (`"abstract"`, `"static"`, ...).
    pub fn from_keyword(keyword: &str) -> Option<Modifiers> {
        Some(match keyword {
            "public" => Modifiers::PUBLIC,
            "protected" => Modifiers::PROTECTED,
            "private" => Modifiers::PRIVATE,
            "internal" => Modifiers::INTERNAL,
            "abstract" => Modifiers::ABSTRACT,
            "open" => Modifiers::OPEN,
            "final" => Modifiers::FINAL,
            "override" => Modifiers::OVERRIDE,
            "static" => Modifiers::STATIC,
            "transient" => Modifiers::TRANSIENT,
            "data" => Modifiers::DATA,
            _ => return None,
        })
    }

    pub fn has_explicit_visibility(self) -> bool {
        self.intersects(Modifiers::VISIBILITY)
    }
}
