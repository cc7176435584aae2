use std::fmt;

use nova_classfile::flags;

/// Java language modifiers, bit-compatible with JVM access flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u16);

/// Access level derived from the visibility bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const PUBLIC: Modifiers = Modifiers(flags::ACC_PUBLIC);
    pub const PRIVATE: Modifiers = Modifiers(flags::ACC_PRIVATE);
    pub const PROTECTED: Modifiers = Modifiers(flags::ACC_PROTECTED);
    pub const STATIC: Modifiers = Modifiers(flags::ACC_STATIC);
    pub const FINAL: Modifiers = Modifiers(flags::ACC_FINAL);
    pub const SYNCHRONIZED: Modifiers = Modifiers(flags::ACC_SYNCHRONIZED);
    pub const VOLATILE: Modifiers = Modifiers(flags::ACC_VOLATILE);
    pub const TRANSIENT: Modifiers = Modifiers(flags::ACC_TRANSIENT);
    pub const NATIVE: Modifiers = Modifiers(flags::ACC_NATIVE);
    pub const INTERFACE: Modifiers = Modifiers(flags::ACC_INTERFACE);
    pub const ABSTRACT: Modifiers = Modifiers(flags::ACC_ABSTRACT);
    pub const STRICT: Modifiers = Modifiers(flags::ACC_STRICT);

    /// Bits that decide accessibility.
    pub const VISIBILITY: Modifiers =
        Modifiers(flags::ACC_PUBLIC | flags::ACC_PROTECTED | flags::ACC_PRIVATE);

    const CLASS_BITS: u16 = flags::ACC_PUBLIC
        | flags::ACC_PROTECTED
        | flags::ACC_PRIVATE
        | flags::ACC_STATIC
        | flags::ACC_FINAL
        | flags::ACC_INTERFACE
        | flags::ACC_ABSTRACT
        | flags::ACC_STRICT;
    const FIELD_BITS: u16 = flags::ACC_PUBLIC
        | flags::ACC_PROTECTED
        | flags::ACC_PRIVATE
        | flags::ACC_STATIC
        | flags::ACC_FINAL
        | flags::ACC_VOLATILE
        | flags::ACC_TRANSIENT;
    const METHOD_BITS: u16 = flags::ACC_PUBLIC
        | flags::ACC_PROTECTED
        | flags::ACC_PRIVATE
        | flags::ACC_STATIC
        | flags::ACC_FINAL
        | flags::ACC_SYNCHRONIZED
        | flags::ACC_NATIVE
        | flags::ACC_ABSTRACT
        | flags::ACC_STRICT;
    const CONSTRUCTOR_BITS: u16 = flags::ACC_PUBLIC | flags::ACC_PROTECTED | flags::ACC_PRIVATE;

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn from_bits(bits: u16) -> Self {
        Modifiers(bits)
    }

    /// Language modifiers of a class or interface; JVM-only bits (`ACC_SUPER`, `ACC_SYNTHETIC`,
    /// ...) are dropped.
    pub const fn for_class(access_flags: u16) -> Self {
        Modifiers(access_flags & Self::CLASS_BITS)
    }

    pub const fn for_field(access_flags: u16) -> Self {
        Modifiers(access_flags & Self::FIELD_BITS)
    }

    /// Language modifiers of a method; `ACC_BRIDGE` and `ACC_VARARGS` share bits with field
    /// modifiers and are dropped.
    pub const fn for_method(access_flags: u16) -> Self {
        Modifiers(access_flags & Self::METHOD_BITS)
    }

    pub const fn for_constructor(access_flags: u16) -> Self {
        Modifiers(access_flags & Self::CONSTRUCTOR_BITS)
    }

    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Modifiers) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    pub const fn difference(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }

    pub const fn intersection(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & other.0)
    }

    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    pub fn is_protected(self) -> bool {
        self.contains(Self::PROTECTED)
    }

    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    pub fn is_interface(self) -> bool {
        self.contains(Self::INTERFACE)
    }

    pub fn visibility(self) -> Visibility {
        if self.is_public() {
            Visibility::Public
        } else if self.is_protected() {
            Visibility::Protected
        } else if self.is_private() {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl std::ops::BitAnd for Modifiers {
    type Output = Modifiers;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

/// Keywords in the canonical order of JLS 8.1.1, 8.3.1, 8.4.3 and 9.1.1.
const KEYWORDS: &[(Modifiers, &str)] = &[
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::STATIC, "static"),
    (Modifiers::FINAL, "final"),
    (Modifiers::TRANSIENT, "transient"),
    (Modifiers::VOLATILE, "volatile"),
    (Modifiers::SYNCHRONIZED, "synchronized"),
    (Modifiers::NATIVE, "native"),
    (Modifiers::STRICT, "strictfp"),
    (Modifiers::INTERFACE, "interface"),
];

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (bit, keyword) in KEYWORDS {
            if !self.contains(*bit) {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifiers({:#06x}: {})", self.0, self)
    }
}
