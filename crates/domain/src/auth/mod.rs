//! Session and identity domain types

mod types;

pub use types::{
    Identity, OrgRole, Session, SessionUpdate, UserType, bearer, token_preview,
};
