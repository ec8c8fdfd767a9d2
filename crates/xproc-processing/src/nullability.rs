use std::fmt;
use xproc_symbols::eager::NativeNullability;
use xproc_symbols::resolved::AnnotatedNullability;

/// Uniform three-valued nullability.
///
/// `Unknown` is reported when the back end cannot tell, including every type
/// whose resolution failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Nullability {
    Nullable,
    NonNull,
    Unknown,
}

impl From<NativeNullability> for Nullability {
    fn from(native: NativeNullability) -> Self {
        match native {
            NativeNullability::Nullable => Nullability::Nullable,
            NativeNullability::NotNull => Nullability::NonNull,
            NativeNullability::Platform => Nullability::Unknown,
        }
    }
}

impl From<Option<AnnotatedNullability>> for Nullability {
    fn from(annotated: Option<AnnotatedNullability>) -> Self {
        match annotated {
            Some(AnnotatedNullability::Nullable) => Nullability::Nullable,
            Some(AnnotatedNullability::NonNull) => Nullability::NonNull,
            None => Nullability::Unknown,
        }
    }
}

impl fmt::Display for Nullability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Nullability::Nullable => "nullable",
            Nullability::NonNull => "nonnull",
            Nullability::Unknown => "unknown",
        })
    }
}
