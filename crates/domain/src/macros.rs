//! Macro for implementing Display and FromStr for keyword enums
//!
//! Used for enums that travel as lowercase keywords in configuration files
//! and environment variables.
//!
//! # Example
//!
//! ```rust
//! use tenantform_domain::impl_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Stable,
//!     Beta,
//! }
//!
//! impl_keyword_conversions!(Channel {
//!     Stable => "stable",
//!     Beta => "beta",
//! });
//! ```

/// Implements Display and FromStr for keyword enums
///
/// Parsing is case-insensitive and ignores surrounding whitespace; output
/// is always the lowercase keyword.
#[macro_export]
macro_rules! impl_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
