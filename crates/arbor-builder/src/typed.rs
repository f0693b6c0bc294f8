//! Typed attribute façade
//!
//! Maps a marker type to an attribute name at compile time, so that call
//! sites name attributes through types instead of strings:
//!
//! ```rust,ignore
//! pub struct Input;
//!
//! declare_members! {
//!     Input {
//!         pub Disabled => "disabled": bool,
//!         pub Placeholder => "placeholder": String,
//!     }
//! }
//!
//! builder.open_element("input")?;
//! builder.typed::<Input>().set::<Disabled>(true)?.set::<Placeholder>("Name")?;
//! ```

use std::marker::PhantomData;

use arbor_sink::{IntoAttrValue, RenderSink};

use crate::{BuildResult, TreeBuilder};

/// A named, typed attribute of `Owner`
pub trait Member {
    /// Type the attribute belongs to
    type Owner;
    /// Value type accepted for the attribute
    type Value: IntoAttrValue;
    /// Attribute name
    const NAME: &'static str;
}

/// Declare [`Member`] marker types for an owner
///
/// The owner appears in each marker's `Member` impl, so a marker may not
/// be more visible than its owner: `pub` markers need a `pub` owner.
#[macro_export]
macro_rules! declare_members {
    ($owner:ty { $( $(#[$meta:meta])* $vis:vis $marker:ident => $name:literal : $value:ty ),* $(,)? }) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            $vis struct $marker;

            impl $crate::Member for $marker {
                type Owner = $owner;
                type Value = $value;
                const NAME: &'static str = $name;
            }
        )*
    };
}

impl<'s, S: RenderSink + ?Sized> TreeBuilder<'s, S> {
    /// Add an attribute named by `M`
    ///
    /// Same as `attribute(M::NAME, value)`.
    pub fn member<M: Member>(&mut self, value: impl Into<M::Value>) -> BuildResult<&mut Self> {
        self.attribute(M::NAME, value.into())
    }

    /// View restricted to the members of `T`
    pub fn typed<T>(&mut self) -> Typed<'_, 's, S, T> {
        Typed {
            builder: self,
            _owner: PhantomData,
        }
    }
}

/// Builder view that only accepts members of `T`
pub struct Typed<'b, 's, S: RenderSink + ?Sized, T> {
    builder: &'b mut TreeBuilder<'s, S>,
    _owner: PhantomData<fn() -> T>,
}

impl<'s, S: RenderSink + ?Sized, T> Typed<'_, 's, S, T> {
    /// Set member `M` of `T`
    pub fn set<M: Member<Owner = T>>(
        &mut self,
        value: impl Into<M::Value>,
    ) -> BuildResult<&mut Self> {
        self.builder.member::<M>(value)?;
        Ok(self)
    }

    /// Back to the untyped builder
    pub fn builder(&mut self) -> &mut TreeBuilder<'s, S> {
        &mut *self.builder
    }
}
