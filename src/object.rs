//! Capability marker and type-erased object view
//!
//! Only types implementing [`ApiObject`] can be registered in a
//! [`Scheme`](crate::Scheme). The marker has no items; it exists so that
//! helper types cannot end up in the registry by accident. The default
//! kind-name of a type is declared at compile time through [`Kind`].
//!
//! The [`api_object!`](crate::api_object) macro implements both for a list of
//! types, deriving each kind-name from the type identifier:
//!
//! ```
//! use api_scheme::api_object;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! pub struct Widget {
//!     pub name: String,
//! }
//!
//! api_object!(Widget);
//!
//! assert_eq!(<Widget as api_scheme::Kind>::KIND, "Widget");
//! ```

use std::any::{Any, TypeId};
use std::fmt;

/// Marker for types that may enter the registry
pub trait ApiObject: Any + Send + Sync + fmt::Debug {}

/// Compile-time declaration of a type's default kind-name
pub trait Kind: ApiObject {
    const KIND: &'static str;
}

/// Object-safe view of any [`ApiObject`]
pub trait Object: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// Rust type name of the concrete object
    fn type_name(&self) -> &'static str;
}

impl<T: ApiObject> Object for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl dyn Object {
    /// `TypeId` of the concrete object behind the trait object
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn is<T: ApiObject>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: ApiObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Recover the concrete object, handing the box back on a wrong guess
    pub fn downcast<T: ApiObject>(self: Box<Self>) -> Result<Box<T>, Box<dyn Object>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(obj) => Ok(obj),
                Err(_) => unreachable!("type checked above"),
            }
        } else {
            Err(self)
        }
    }
}

/// Implement [`ApiObject`] and [`Kind`] for each listed type.
///
/// The kind-name is the type identifier. Use
/// [`Scheme::add_known_type_with_name`](crate::Scheme::add_known_type_with_name)
/// for additional names.
#[macro_export]
macro_rules! api_object {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::ApiObject for $ty {}

            impl $crate::Kind for $ty {
                const KIND: &'static str = stringify!($ty);
            }
        )+
    };
}
