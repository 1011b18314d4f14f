use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        $(#[$meta])*
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    #[serde(rename_all = "lowercase")]
    AppointmentStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

str_enum!(
    /// Half of a 12-hour clock.
    #[serde(rename_all = "UPPERCASE")]
    Period {
        Am => "AM",
        Pm => "PM",
    }
);

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_round_trip() {
        for (variant, s) in [
            (AppointmentStatus::Pending, "pending"),
            (AppointmentStatus::Confirmed, "confirmed"),
            (AppointmentStatus::Completed, "completed"),
            (AppointmentStatus::Cancelled, "cancelled"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn period_parses_uppercase_only() {
        assert_eq!(Period::from_str("AM").unwrap(), Period::Am);
        assert_eq!(Period::from_str("PM").unwrap(), Period::Pm);
        assert!(Period::from_str("pm").is_err());
    }

    #[test]
    fn serde_uses_stored_spelling() {
        assert_eq!(serde_json::to_string(&Period::Pm).unwrap(), "\"PM\"");
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        let p: Period = serde_json::from_str("\"AM\"").unwrap();
        assert_eq!(p, Period::Am);
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = AppointmentStatus::from_str("rescheduled").unwrap_err();
        assert!(err.to_string().contains("AppointmentStatus"));
        assert!(Period::from_str("").is_err());
    }
}
