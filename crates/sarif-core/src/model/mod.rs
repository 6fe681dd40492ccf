//! Typed object graphs for the two SARIF schema generations.
//!
//! Field order in every struct follows the order in which the reference
//! serializers emit properties, so a compact serialization of a parsed
//! document is stable and can be compared as text.

/// Declares a string-valued SARIF enum. Unrecognized strings are kept in an
/// `Unknown` variant instead of failing deserialization.
macro_rules! sarif_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Unknown(s) => s.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($text => $name::$variant,)+
                    other => $name::Unknown(other.to_string()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok($name::from(s.as_str()))
            }
        }
    };
}

pub mod property_bag;
pub mod timestamp;
pub mod v1;
pub mod v2;

pub use property_bag::{PropertyBag, V1_RUN_KEY, V2_RUN_KEY};
pub use timestamp::Timestamp;

#[cfg(test)]
mod tests {
    sarif_enum!(Color {
        Red => "red",
        DarkBlue => "darkBlue",
    });

    #[test]
    fn test_unknown_enum_text_survives() {
        let c: Color = serde_json::from_str(r#""chartreuse""#).unwrap();
        assert_eq!(c, Color::Unknown("chartreuse".into()));
        assert!(!c.is_known());
        assert_eq!(serde_json::to_string(&c).unwrap(), r#""chartreuse""#);

        let c: Color = serde_json::from_str(r#""darkBlue""#).unwrap();
        assert_eq!(c, Color::DarkBlue);
        assert_eq!(c.to_string(), "darkBlue");
    }
}
