/// Declares a process-unique, monotonically issued identity token.
///
/// Tokens compare by value and are never reused within a process, which makes
/// them suitable as object identity for entities that are shared by handle.
///
/// ```
/// foundation::sequential_id! {
///     /// Identity of a widget.
///     pub struct WidgetId;
/// }
///
/// let a = WidgetId::fresh();
/// let b = WidgetId::fresh();
/// assert_ne!(a, b);
/// ```
#[macro_export]
macro_rules! sequential_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name(u64);

        impl $name {
            /// Issue the next unused token.
            pub fn fresh() -> Self {
                use ::std::sync::atomic::{AtomicU64, Ordering};
                static NEXT: AtomicU64 = AtomicU64::new(1);
                Self(NEXT.fetch_add(1, Ordering::Relaxed))
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    sequential_id! {
        struct TestId;
    }

    #[test]
    fn fresh_ids_are_unique_and_increasing() {
        let a = TestId::fresh();
        let b = TestId::fresh();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
        assert!(a.to_string().starts_with("TestId#"));
    }
}
