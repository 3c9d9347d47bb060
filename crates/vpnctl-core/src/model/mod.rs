// ── Domain model ──
//
// Canonical types shared by the registry, the managers, and the
// method-call boundary. Field names serialize in camelCase and the
// small enums serialize as their integer ordinal, which is the shape
// transport adapters exchange with the host UI.

/// Integer wire encoding for the fieldless `#[repr(u8)]` enums.
macro_rules! ordinal_enum {
    ($ty:ident, $kind:literal) => {
        impl From<$ty> for i64 {
            fn from(value: $ty) -> Self {
                i64::from(value as u8)
            }
        }

        impl TryFrom<i64> for $ty {
            type Error = crate::error::CoreError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                u8::try_from(value)
                    .ok()
                    .and_then(Self::from_repr)
                    .ok_or(crate::error::CoreError::UnknownVariant { kind: $kind, value })
            }
        }
    };
}

pub(crate) use ordinal_enum;

mod profile;
mod request;
mod server;
mod state;

pub use profile::{ProfileId, RoutingMode, RoutingProfile};
pub use request::VpnRequest;
pub use server::{Server, ServerId, VpnProtocol};
pub use state::ConnectionState;
