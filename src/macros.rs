/// Implements conversion traits on a type wrapping a `luxo` object. Useful for
/// when you wrap a `luxo` type with your own struct. Allows you to use that
/// struct in place of any [`Base`].
///
/// Implements the following traits:
///
/// * `AsRef<Base>`
/// * `AsRef<NodePointer>`
/// * `Deref<Target = Base>`
/// * `DerefMut<Base>`
///
/// If the field parameter is omitted then the field name defaults to `object`.
///
/// [`Base`]: object/struct.Base.html
#[macro_export]
macro_rules! luxo_object {
    ($($name:ident),*) => {
        luxo_object!($($name::object),*);
    };
    ($($name:ident::$field:ident),*) => {
        $(
            impl AsRef<$crate::Base> for $name {
                fn as_ref(&self) -> &$crate::Base {
                    &self.$field
                }
            }

            impl AsRef<$crate::NodePointer> for $name {
                fn as_ref(&self) -> &$crate::NodePointer {
                    self.$field.as_ref()
                }
            }

            impl ::std::ops::Deref for $name {
                type Target = $crate::Base;
                fn deref(&self) -> &$crate::Base {
                    &self.$field
                }
            }

            impl ::std::ops::DerefMut for $name {
                fn deref_mut(&mut self) -> &mut $crate::Base {
                    &mut self.$field
                }
            }
        )*
    };
}
