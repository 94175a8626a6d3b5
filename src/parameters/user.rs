//! Authenticated user extraction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::parameters::types::{namespace, ParameterMap};

/// Value of `user:userId` when no user is attached to the request.
pub const ANONYMOUS_USER_ID: &str = "_";

/// User object attached to a request by an upstream authentication layer.
///
/// Insert it into the request extensions; every field becomes `user:<field>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthenticatedUser(pub Map<String, Value>);

impl AuthenticatedUser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }
}

impl From<Map<String, Value>> for AuthenticatedUser {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Copy user fields, or the anonymous sentinel when there is no user.
pub fn extract_user(user: Option<&AuthenticatedUser>, params: &mut ParameterMap) {
    match user {
        Some(user) => {
            for (field, value) in &user.0 {
                params.insert(namespace::USER, field, value.clone());
            }
        }
        None => params.insert(namespace::USER, "userId", ANONYMOUS_USER_ID),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anonymous_sentinel() {
        let mut params = ParameterMap::new();
        extract_user(None, &mut params);

        assert_eq!(params.get_str("user:userId"), Some("_"));
        assert_eq!(params.namespace(namespace::USER).count(), 1);
    }

    #[test]
    fn test_fields_carried_verbatim() {
        let user = AuthenticatedUser::new()
            .with("userId", 13579)
            .with("displayName", "will.i.am");

        let mut params = ParameterMap::new();
        extract_user(Some(&user), &mut params);

        assert_eq!(params.get("user:userId"), Some(&json!(13579)));
        assert_eq!(params.get_str("user:displayName"), Some("will.i.am"));
        assert_eq!(params.namespace(namespace::USER).count(), 2);
    }

    #[test]
    fn test_user_without_id_gets_no_default() {
        let user = AuthenticatedUser::new().with("displayName", "guest");

        let mut params = ParameterMap::new();
        extract_user(Some(&user), &mut params);

        assert!(!params.contains_key("user:userId"));
    }
}
