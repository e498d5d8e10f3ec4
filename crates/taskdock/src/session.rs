/// Holds the bearer credential for one page session.
///
/// Presence of a credential is the sole gate for authenticated gateway calls
/// and for starting the poll scheduler. There is no expiry and no logout:
/// the token lives until the session itself is dropped with its connection.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the token returned by a successful authenticate call. The value
    /// is opaque; no shape validation.
    pub fn set_credential(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn has_credential(&self) -> bool {
        self.token.is_some()
    }

    pub fn credential(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_credential() {
        let store = SessionStore::new();
        assert!(!store.has_credential());
        assert_eq!(store.credential(), None);
    }

    #[test]
    fn stores_token_as_is() {
        let mut store = SessionStore::new();
        store.set_credential("abc".to_string());
        assert!(store.has_credential());
        assert_eq!(store.credential(), Some("abc"));
    }
}
