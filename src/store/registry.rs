//! Component kind registration.
//!
//! [`define_components!`] is invoked exactly once, in
//! [`crate::components`], with the full list of component types and their
//! numeric ids. It generates:
//! - `ComponentKind`, a `#[repr(u8)]` enum whose discriminants are the ids
//! - `AnyComponent`, the closed sum type used for heterogeneous attach/detach
//! - `Columns`, one [`Arena`](super::Arena) per kind
//! - a [`Component`](super::Component) impl for every listed type
//!
//! Ids are fixed at compile time and never depend on call order.

macro_rules! define_components {
    ($( $(#[$meta:meta])* $kind:ident = $id:literal => $field:ident ),+ $(,)?) => {
        /// Stable identifier of every registered component type.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum ComponentKind {
            $( $(#[$meta])* $kind = $id, )+
        }

        impl ComponentKind {
            /// Every registered kind, in id order.
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$kind),+];

            /// Numeric id of this kind.
            #[inline]
            pub const fn id(self) -> u8 {
                self as u8
            }

            /// Look a kind up by numeric id.
            pub fn from_id(id: u8) -> Option<Self> {
                match id {
                    $( $id => Some(ComponentKind::$kind), )+
                    _ => None,
                }
            }

            /// Type name of this kind, for diagnostics.
            pub const fn name(self) -> &'static str {
                match self {
                    $( ComponentKind::$kind => stringify!($kind), )+
                }
            }
        }

        /// Any registered component, by value.
        #[derive(Clone, Debug)]
        pub enum AnyComponent {
            $( $(#[$meta])* $kind($kind), )+
        }

        impl AnyComponent {
            /// Kind of the wrapped component.
            pub fn kind(&self) -> ComponentKind {
                match self {
                    $( AnyComponent::$kind(_) => ComponentKind::$kind, )+
                }
            }
        }

        $(
            impl From<$kind> for AnyComponent {
                fn from(component: $kind) -> Self {
                    AnyComponent::$kind(component)
                }
            }

            impl $crate::store::Component for $kind {
                const KIND: ComponentKind = ComponentKind::$kind;

                #[inline]
                fn column(columns: &Columns) -> &$crate::store::Arena<Self> {
                    &columns.$field
                }

                #[inline]
                fn column_mut(columns: &mut Columns) -> &mut $crate::store::Arena<Self> {
                    &mut columns.$field
                }

                fn from_any(component: AnyComponent) -> Option<Self> {
                    match component {
                        AnyComponent::$kind(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+

        /// Typed storage, one arena per registered kind.
        #[derive(Default)]
        pub struct Columns {
            $( pub $field: $crate::store::Arena<$kind>, )+
        }

        impl Columns {
            /// Total number of live components across all kinds.
            pub fn len(&self) -> usize {
                0 $( + self.$field.len() )+
            }

            /// Whether no component of any kind is stored.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            pub(crate) fn insert_any(
                &mut self,
                owner: $crate::store::Entity,
                component: AnyComponent,
            ) -> $crate::store::ComponentRef {
                match component {
                    $(
                        AnyComponent::$kind(inner) => $crate::store::ComponentRef {
                            kind: ComponentKind::$kind,
                            handle: self.$field.insert(owner, inner).raw(),
                        },
                    )+
                }
            }

            pub(crate) fn remove_raw(
                &mut self,
                component: $crate::store::ComponentRef,
            ) -> Option<($crate::store::Entity, AnyComponent)> {
                match component.kind {
                    $(
                        ComponentKind::$kind => self
                            .$field
                            .remove($crate::store::Handle::from_raw(component.handle))
                            .map(|(owner, inner)| (owner, AnyComponent::$kind(inner))),
                    )+
                }
            }

            pub(crate) fn owner_raw(
                &self,
                component: $crate::store::ComponentRef,
            ) -> Option<$crate::store::Entity> {
                match component.kind {
                    $(
                        ComponentKind::$kind => self
                            .$field
                            .owner($crate::store::Handle::from_raw(component.handle)),
                    )+
                }
            }
        }
    };
}

pub(crate) use define_components;
