//! Macro for declaring fieldless state enums.

/// Declare a fieldless enum and implement [`State`](crate::core::State) for it.
///
/// The generated type derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
/// `Debug` and serde's traits, implements `Display` using the variant name,
/// and exposes every variant in declaration order through `ALL`.
///
/// # Example
///
/// ```
/// use interstage::state_enum;
/// use interstage::core::State;
///
/// state_enum! {
///     pub enum Beacon {
///         Off,
///         Amber,
///         Blank,
///     }
///     final: [Blank]
/// }
///
/// assert_eq!(Beacon::ALL.len(), 3);
/// assert_eq!(Beacon::Amber.to_string(), "Amber");
/// assert!(Beacon::Blank.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum Cycle {
            First,
            Second,
            Last,
        }
        final: [Last]
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(Cycle::First.name(), "First");
        assert!(!Cycle::First.is_final());
        assert!(!Cycle::Second.is_final());
        assert!(Cycle::Last.is_final());
    }

    #[test]
    fn state_enum_lists_variants_in_order() {
        assert_eq!(Cycle::ALL, &[Cycle::First, Cycle::Second, Cycle::Last]);
    }

    #[test]
    fn state_enum_displays_variant_name() {
        assert_eq!(format!("{}", Cycle::Second), "Second");
    }

    #[test]
    fn state_enum_works_without_final() {
        state_enum! {
            enum Minimal {
                One,
                Two,
            }
        }

        assert!(!Minimal::One.is_final());
        assert!(!Minimal::Two.is_final());
    }
}
