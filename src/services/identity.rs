use crate::host::HostBridge;
use crate::models::identity::{HostUser, Identity, GUEST_NAME};

pub struct IdentityResolver;

impl IdentityResolver {
    /// Reads the host context once. A missing user, or a user without an
    /// id, yields an unauthenticated identity.
    pub fn resolve(bridge: &dyn HostBridge) -> Identity {
        match bridge.user() {
            Some(user) => Self::from_host_user(user),
            None => {
                log::warn!("Host did not provide a user.");
                Identity::guest()
            }
        }
    }

    fn from_host_user(user: HostUser) -> Identity {
        let display_name = user
            .username
            .filter(|name| !name.is_empty())
            .or(user.first_name.filter(|name| !name.is_empty()))
            .unwrap_or_else(|| GUEST_NAME.to_string());

        Identity {
            id: user.id,
            display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBridge(Option<HostUser>);

    impl HostBridge for FixedBridge {
        fn ready(&self) {}

        fn user(&self) -> Option<HostUser> {
            self.0.clone()
        }
    }

    fn host_user(id: Option<i64>, username: Option<&str>, first_name: Option<&str>) -> HostUser {
        HostUser {
            id,
            username: username.map(str::to_string),
            first_name: first_name.map(str::to_string),
        }
    }

    #[test]
    fn prefers_username_then_first_name_then_guest() {
        let identity = IdentityResolver::resolve(&FixedBridge(Some(host_user(
            Some(1),
            Some("alice"),
            Some("Alice"),
        ))));
        assert_eq!(identity.display_name, "alice");
        assert_eq!(identity.require_id(), Ok(1));

        let identity =
            IdentityResolver::resolve(&FixedBridge(Some(host_user(Some(1), None, Some("Alice")))));
        assert_eq!(identity.display_name, "Alice");

        let identity = IdentityResolver::resolve(&FixedBridge(Some(host_user(Some(1), None, None))));
        assert_eq!(identity.display_name, "Guest");
    }

    #[test]
    fn missing_user_is_unauthenticated() {
        let identity = IdentityResolver::resolve(&FixedBridge(None));
        assert!(!identity.is_authenticated());
        assert_eq!(identity.display_name, "Guest");
        assert!(identity.require_id().is_err());
    }
}
