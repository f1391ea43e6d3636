//! Typed slug references
//!
//! Checks and grants accept bare slug strings, slug lists, or application
//! enums with a declared slug mapping. `SlugRef` is that mapping: a
//! value-backed enum returns its backing value, a name-backed enum its
//! member name. Anything else is not a role/permission reference and will
//! not compile, which is this crate's form of the invalid-reference
//! contract; the remaining runtime violation (a blank slug) is rejected at
//! the store's resolution boundary.

/// A value with a declared role/permission slug mapping.
///
/// # Examples
///
/// ```
/// use acl_model::SlugRef;
///
/// enum AppRole {
///     Admin,
///     Editor,
/// }
///
/// impl SlugRef for AppRole {
///     fn as_slug(&self) -> String {
///         match self {
///             AppRole::Admin => "admin".into(),
///             AppRole::Editor => "editor".into(),
///         }
///     }
/// }
///
/// assert_eq!(AppRole::Admin.as_slug(), "admin");
/// ```
pub trait SlugRef {
    /// The slug this reference resolves to.
    fn as_slug(&self) -> String;
}

impl SlugRef for str {
    fn as_slug(&self) -> String {
        self.to_string()
    }
}

impl SlugRef for String {
    fn as_slug(&self) -> String {
        self.clone()
    }
}

impl<T: SlugRef + ?Sized> SlugRef for &T {
    fn as_slug(&self) -> String {
        (**self).as_slug()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum AppRole {
        Admin,
        Guest,
    }

    impl SlugRef for AppRole {
        fn as_slug(&self) -> String {
            match self {
                AppRole::Admin => "admin".into(),
                AppRole::Guest => "guest".into(),
            }
        }
    }

    #[test]
    fn test_str_refs() {
        assert_eq!("admin".as_slug(), "admin");
        assert_eq!(String::from("editor").as_slug(), "editor");
    }

    #[test]
    fn test_enum_refs() {
        assert_eq!(AppRole::Admin.as_slug(), "admin");
        assert_eq!(AppRole::Guest.as_slug(), "guest");
    }
}
