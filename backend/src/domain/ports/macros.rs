//! Declares port error enums whose variants all carry a `message`.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum StoreError {
//!         Connection => "connection failed: {message}",
//!     }
//! }
//! let err = StoreError::connection("refused");
//! ```
//!
//! Each variant becomes `Variant { message: String }` with a `thiserror`
//! message and a snake_case constructor taking `impl Into<String>`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $display:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant { message: String },
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                )+

                /// Human-readable detail without the variant prefix.
                pub fn message(&self) -> &str {
                    match self {
                        $(Self::$variant { message } => message,)+
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;
