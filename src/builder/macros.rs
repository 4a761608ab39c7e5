//! Macros for declaring actions and extended state.

/// Declare a closed action set and its `Action` implementation.
///
/// Each variant names the `type` it has in machine definitions. Variant
/// fields become the payload of the action object.
///
/// # Example
///
/// ```
/// use statebind::action_enum;
/// use statebind::core::Action;
///
/// action_enum! {
///     pub enum LightAction {
///         StartUnblockTimer { delay: u64 } => "startUnblockTimer",
///         CancelUnblockTimer => "cancelUnblockTimer",
///         TurnOn => "turnOn",
///     }
/// }
///
/// let action: LightAction =
///     serde_json::from_str(r#"{ "type": "startUnblockTimer", "delay": 2000 }"#).unwrap();
/// assert_eq!(action, LightAction::StartUnblockTimer { delay: 2000 });
/// assert_eq!(action.name(), "startUnblockTimer");
/// ```
#[macro_export]
macro_rules! action_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $({ $($field:ident : $field_ty:ty),* $(,)? })? => $tag:tt
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        #[serde(tag = "type")]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $tag)]
                $variant $({ $($field: $field_ty),* })?
            ),*
        }

        impl $crate::core::Action for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => $tag),*
                }
            }
        }
    };
}

/// Declare an extended state record and its patch type.
///
/// The patch has one `Option` per field and a chainable setter per field.
/// Merging patches keeps the later value of each field; applying a patch
/// overwrites only the fields it sets.
///
/// # Example
///
/// ```
/// use statebind::extended_state;
/// use statebind::core::{ExtendedState, Patch};
///
/// extended_state! {
///     pub struct Light {
///         pub on: bool,
///         pub blocked: bool,
///     }
///     patch: LightPatch
/// }
///
/// let light = Light { on: false, blocked: false };
/// let patch = LightPatch::new().blocked(true).merge(LightPatch::new().on(true));
///
/// assert_eq!(light.patched(patch), Light { on: true, blocked: true });
/// ```
#[macro_export]
macro_rules! extended_state {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
        patch: $patch:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty
            ),*
        }

        #[doc = concat!("Partial update of [`", stringify!($name), "`].")]
        #[derive(Clone, PartialEq, Debug, Default)]
        $vis struct $patch {
            $($field_vis $field: Option<$field_ty>),*
        }

        impl $patch {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $field(mut self, value: impl Into<$field_ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }

        impl $crate::core::Patch for $patch {
            fn merge(self, later: Self) -> Self {
                Self {
                    $($field: later.$field.or(self.$field)),*
                }
            }

            fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }

        impl $crate::core::ExtendedState for $name {
            type Patch = $patch;

            fn apply(&mut self, patch: $patch) {
                $(
                    if let Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}
