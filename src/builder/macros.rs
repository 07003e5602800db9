//! Macros for declaring normalized identifier enums.

/// Declare a dense state enum with a description per variant.
///
/// Variants are numbered `0, 1, 2, ...` in declaration order, which is what
/// the validator requires. The generated enum converts into
/// [`StateId`](crate::core::StateId) and can produce the state description
/// table directly.
///
/// # Example
///
/// ```
/// use tablefsm::core::StateId;
/// use tablefsm::state_ids;
///
/// state_ids! {
///     pub enum Session {
///         Idle => "Idle State",
///         Established => "Established State",
///     }
/// }
///
/// assert_eq!(StateId::from(Session::Established), StateId::new(1));
/// assert_eq!(Session::descriptions().len(), 2);
/// assert_eq!(Session::from_id(StateId::new(0)), Some(Session::Idle));
/// ```
#[macro_export]
macro_rules! state_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $description:expr
            ),* $(,)?
        }
    ) => {
        $crate::__normalized_ids! {
            $crate::core::StateId, $crate::core::StateDescription;
            $(#[$meta])*
            $vis enum $name {
                $( $(#[$variant_meta])* $variant => $description ),*
            }
        }
    };
}

/// Declare a dense event enum with a description per variant.
///
/// The event counterpart of [`state_ids!`]: converts into
/// [`EventId`](crate::core::EventId) and produces the event description
/// table.
///
/// # Example
///
/// ```
/// use tablefsm::core::EventId;
/// use tablefsm::event_ids;
///
/// event_ids! {
///     enum Signal {
///         Start => "Start",
///         Stop => "Stop",
///     }
/// }
///
/// assert_eq!(Signal::Stop.id(), EventId::new(1));
/// assert_eq!(Signal::Start.description(), "Start");
/// ```
#[macro_export]
macro_rules! event_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $description:expr
            ),* $(,)?
        }
    ) => {
        $crate::__normalized_ids! {
            $crate::core::EventId, $crate::core::EventDescription;
            $(#[$meta])*
            $vis enum $name {
                $( $(#[$variant_meta])* $variant => $description ),*
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __normalized_ids {
    (
        $id:ty, $record:ty;
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $description:expr
            ),*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        #[repr(u32)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        #[allow(dead_code)]
        impl $name {
            /// Every variant, in id order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn id(self) -> $id {
                <$id>::new(self as u32)
            }

            pub fn description(self) -> &'static str {
                match self {
                    $(Self::$variant => $description),*
                }
            }

            pub fn from_id(id: $id) -> Option<Self> {
                Self::ALL.get(id.index()).copied()
            }

            /// Description table for this enum, ready for validation.
            pub fn descriptions() -> Vec<$record> {
                Self::ALL
                    .iter()
                    .map(|v| <$record>::new(v.id(), v.description()))
                    .collect()
            }
        }

        impl From<$name> for $id {
            fn from(value: $name) -> Self {
                value.id()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{EventId, StateId};

    state_ids! {
        enum TestState {
            Initial => "Initial State",
            Processing => "Processing State",
            Complete => "Complete State",
        }
    }

    event_ids! {
        enum TestEvent {
            Begin => "Begin",
            Finish => "Finish",
        }
    }

    #[test]
    fn state_ids_are_dense_in_declaration_order() {
        assert_eq!(TestState::Initial.id(), StateId::new(0));
        assert_eq!(TestState::Processing.id(), StateId::new(1));
        assert_eq!(TestState::Complete.id(), StateId::new(2));
        assert_eq!(TestState::ALL.len(), 3);
    }

    #[test]
    fn descriptions_table_matches_variants() {
        let table = TestState::descriptions();
        assert_eq!(table.len(), 3);
        assert_eq!(table[1].id, StateId::new(1));
        assert_eq!(table[1].description, "Processing State");
    }

    #[test]
    fn from_id_maps_back_to_variants() {
        assert_eq!(TestState::from_id(StateId::new(2)), Some(TestState::Complete));
        assert_eq!(TestState::from_id(StateId::new(3)), None);
        assert_eq!(TestEvent::from_id(EventId::new(1)), Some(TestEvent::Finish));
    }

    #[test]
    fn event_ids_convert_into_event_id() {
        let id: EventId = TestEvent::Finish.into();
        assert_eq!(id, EventId::new(1));
        assert_eq!(TestEvent::Begin.description(), "Begin");
    }

    #[test]
    fn ids_support_visibility() {
        state_ids! {
            pub enum PublicState {
                A => "A",
                B => "B",
            }
        }

        let _state = PublicState::B;
        assert_eq!(PublicState::descriptions()[0].description, "A");
    }
}
