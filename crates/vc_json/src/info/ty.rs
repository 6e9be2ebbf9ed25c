use alloc::string::String;
use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

/// Nominal identity of a Rust type: its [`TypeId`] and compiler-provided path.
///
/// Equality and hashing only consider the [`TypeId`].
///
/// # Examples
///
/// ```
/// use vc_json::info::Type;
///
/// let ty = Type::of::<Vec<String>>();
/// assert_eq!(ty.ident(), "Vec");
/// assert_eq!(ty.short_name(), "Vec<String>");
/// assert!(ty.is::<Vec<String>>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Full path, e.g. `alloc::vec::Vec<alloc::string::String>`.
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Last path segment without generics, e.g. `Vec`.
    pub fn ident(&self) -> &'static str {
        let head = match self.path.find('<') {
            Some(end) => &self.path[..end],
            None => self.path,
        };
        if head.starts_with(['(', '[', '&']) {
            return head;
        }
        match head.rfind("::") {
            Some(pos) => &head[pos + 2..],
            None => head,
        }
    }

    /// The path with every module prefix removed, e.g. `Vec<String>`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.path.len());
        let mut segment_start = 0;
        let mut chars = self.path.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                ':' if chars.peek() == Some(&':') => {
                    chars.next();
                    out.truncate(segment_start);
                }
                '<' | '>' | ',' | ';' | '(' | ')' | '[' | ']' | '&' | ' ' => {
                    out.push(ch);
                    segment_start = out.len();
                }
                _ => out.push(ch),
            }
        }
        out
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::Type;
    use alloc::collections::BTreeMap;
    use alloc::string::String;

    #[test]
    fn names() {
        let ty = Type::of::<BTreeMap<String, (i32, String)>>();
        assert_eq!(ty.ident(), "BTreeMap");
        assert_eq!(ty.short_name(), "BTreeMap<String, (i32, String)>");
        assert_eq!(Type::of::<(u8, String)>().ident(), "(u8, alloc::string::String)");
        assert_eq!(Type::of::<u8>().short_name(), "u8");
    }
}
